//! Reference population: resolving thread ids and author ids into the
//! populated read models.
//!
//! Each helper issues one batched query per level rather than one per
//! document. Lists keep the order of the id lists they were built from; ids
//! that no longer resolve to a thread are skipped.

use std::collections::HashMap;

use threads_core::{
  thread::{Comment, Reply, Thread},
  user::{AuthorSummary, User},
};
use uuid::Uuid;

use crate::{
  encode::{encode_ids, RawThread, RawUser, THREAD_COLUMNS, USER_COLUMNS},
  store::SqliteStore,
  Error, Result,
};

impl SqliteStore {
  /// Fetch threads by id, in the order given.
  pub(crate) async fn threads_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Thread>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let ids_json = encode_ids(ids)?;

    let raws: Vec<RawThread> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {THREAD_COLUMNS} FROM threads
           WHERE thread_id IN (SELECT value FROM json_each(?1))"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ids_json], RawThread::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut by_id: HashMap<Uuid, Thread> = raws
      .into_iter()
      .map(|raw| raw.into_thread().map(|t| (t.thread_id, t)))
      .collect::<Result<_>>()?;

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
  }

  /// Fetch full user documents keyed by document id.
  pub(crate) async fn users_by_ids(
    &self,
    ids: &[Uuid],
  ) -> Result<HashMap<Uuid, User>> {
    if ids.is_empty() {
      return Ok(HashMap::new());
    }
    let ids_json = encode_ids(ids)?;

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users
           WHERE user_id IN (SELECT value FROM json_each(?1))"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ids_json], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| raw.into_user().map(|u| (u.user_id, u)))
      .collect()
  }

  /// Attach the author summary to each thread.
  pub(crate) async fn with_authors(&self, threads: Vec<Thread>) -> Result<Vec<Reply>> {
    let author_ids: Vec<Uuid> = threads.iter().map(|t| t.author_id).collect();
    let authors: HashMap<Uuid, AuthorSummary> = self
      .users_by_ids(&author_ids)
      .await?
      .into_iter()
      .map(|(id, user)| (id, user.summary()))
      .collect();

    threads
      .into_iter()
      .map(|thread| -> Result<Reply> {
        let author = authors
          .get(&thread.author_id)
          .cloned()
          .ok_or(threads_core::Error::UserNotFound(thread.author_id))?;
        Ok(Reply { thread, author })
      })
      .collect()
  }

  /// For each parent, its direct children with authors, in child order.
  pub(crate) async fn replies_for(&self, parents: &[Thread]) -> Result<Vec<Vec<Reply>>> {
    let child_ids: Vec<Uuid> = parents
      .iter()
      .flat_map(|p| p.children.iter().copied())
      .collect();

    let children = self.threads_by_ids(&child_ids).await?;
    let mut by_id: HashMap<Uuid, Reply> = self
      .with_authors(children)
      .await?
      .into_iter()
      .map(|r| (r.thread.thread_id, r))
      .collect();

    Ok(
      parents
        .iter()
        .map(|p| p.children.iter().filter_map(|id| by_id.remove(id)).collect())
        .collect(),
    )
  }

  /// For each parent, its children with their own children populated one
  /// further level.
  pub(crate) async fn comments_for(&self, parents: &[Thread]) -> Result<Vec<Vec<Comment>>> {
    let children = self.replies_for(parents).await?;

    let flat: Vec<Thread> = children
      .iter()
      .flatten()
      .map(|r| r.thread.clone())
      .collect();
    let mut grandchildren = self.replies_for(&flat).await?.into_iter();

    Ok(
      children
        .into_iter()
        .map(|replies| {
          replies
            .into_iter()
            .map(|Reply { thread, author }| Comment {
              thread,
              author,
              replies: grandchildren.next().unwrap_or_default(),
            })
            .collect()
        })
        .collect(),
    )
  }

  /// Look up the author's full document, failing if it does not exist.
  pub(crate) async fn require_user(&self, user_id: Uuid) -> Result<User> {
    self
      .users_by_ids(&[user_id])
      .await?
      .remove(&user_id)
      .ok_or(Error::Core(threads_core::Error::UserNotFound(user_id)))
  }
}
