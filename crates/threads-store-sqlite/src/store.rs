//! [`SqliteStore`], the SQLite implementation of [`ForumStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use threads_core::{
  page::{Page, PageRequest},
  store::{ForumStore, UserSearch},
  thread::{FeedPost, NewComment, NewThread, Reply, Thread, ThreadDetail},
  user::{OwnedThread, ProfileUpdate, User, UserThreads},
};
use uuid::Uuid;

use crate::{
  encode::{
    encode_dt, encode_uuid, like_pattern, now, RawThread, RawUser,
    THREAD_COLUMNS, USER_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A forum document store backed by a single SQLite database.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a store from a connection string: `sqlite://<path>`, a bare path,
  /// or `:memory:` / `sqlite::memory:` for an in-memory database.
  pub async fn connect(url: &str) -> Result<Self> {
    match url.trim() {
      ":memory:" | "sqlite::memory:" | "sqlite://:memory:" => {
        Self::open_in_memory().await
      }
      other => Self::open(other.strip_prefix("sqlite://").unwrap_or(other)).await,
    }
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_thread_doc(&self, id: Uuid) -> Result<Option<Thread>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawThread> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {THREAD_COLUMNS} FROM threads WHERE thread_id = ?1"),
              rusqlite::params![id_str],
              RawThread::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawThread::into_thread).transpose()
  }

  /// Insert a fully-built [`Thread`] into the `threads` table.
  async fn insert_thread(&self, thread: &Thread) -> Result<()> {
    let thread_id_str    = encode_uuid(thread.thread_id);
    let text             = thread.text.clone();
    let author_id_str    = encode_uuid(thread.author_id);
    let parent_id_str    = thread.parent_id.map(encode_uuid);
    let community_id_str = thread.community_id.map(encode_uuid);
    let created_at_str   = encode_dt(thread.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO threads (
             thread_id, text, author_id, parent_id, community_id, children,
             created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, '[]', ?6)",
          rusqlite::params![
            thread_id_str,
            text,
            author_id_str,
            parent_id_str,
            community_id_str,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Append `id` to the JSON id list in `column` of one row of `table`.
  async fn push_id(
    &self,
    table: &'static str,
    column: &'static str,
    key_column: &'static str,
    key: Uuid,
    id: Uuid,
  ) -> Result<()> {
    let key_str = encode_uuid(key);
    let id_str  = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "UPDATE {table} SET {column} = json_insert({column}, '$[#]', ?1)
             WHERE {key_column} = ?2"
          ),
          rusqlite::params![id_str, key_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ForumStore impl ─────────────────────────────────────────────────────────

impl ForumStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn upsert_user(&self, update: ProfileUpdate) -> Result<User> {
    let user_id_str = encode_uuid(Uuid::new_v4());
    let at_str      = encode_dt(now());
    let username    = update.username.to_lowercase();
    let name_folded = update.name.to_lowercase();

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, identity_id, username, name, name_folded, bio, image,
             onboarded, threads, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, '[]', ?8)
           ON CONFLICT(identity_id) DO UPDATE SET
             username    = excluded.username,
             name        = excluded.name,
             name_folded = excluded.name_folded,
             bio         = excluded.bio,
             image       = excluded.image,
             onboarded   = 1",
          rusqlite::params![
            user_id_str,
            update.identity_id,
            username,
            update.name,
            name_folded,
            update.bio,
            update.image,
            at_str,
          ],
        )?;

        Ok(conn.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE identity_id = ?1"),
          rusqlite::params![update.identity_id],
          RawUser::from_row,
        )?)
      })
      .await?;

    raw.into_user()
  }

  async fn get_user(&self, identity_id: &str) -> Result<Option<User>> {
    let identity_id = identity_id.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE identity_id = ?1"),
              rusqlite::params![identity_id],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_threads_for_user(&self, identity_id: &str) -> Result<Option<UserThreads>> {
    let user = match self.get_user(identity_id).await? {
      Some(u) => u,
      None    => return Ok(None),
    };

    let threads = self.threads_by_ids(&user.threads).await?;
    let replies = self.replies_for(&threads).await?;

    let threads = threads
      .into_iter()
      .zip(replies)
      .map(|(thread, replies)| OwnedThread { thread, replies })
      .collect();

    Ok(Some(UserThreads { user, threads }))
  }

  async fn search_users(&self, query: &UserSearch) -> Result<Page<User>> {
    let exclude = query.exclude_identity_id.clone();
    let pattern = query.filter().map(like_pattern);
    let order   = query.sort.sql();
    let skip    = query.page.skip();
    let limit   = query.page.limit();

    let (total, raws): (u64, Vec<RawUser>) = self
      .conn
      .call(move |conn| {
        // Both columns hold lower-cased text, matching the pattern.
        let where_clause = "WHERE identity_id != ?1
             AND (?2 IS NULL
                  OR username    LIKE ?2 ESCAPE '\\'
                  OR name_folded LIKE ?2 ESCAPE '\\')";

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM users {where_clause}"),
          rusqlite::params![exclude, pattern],
          |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users {where_clause}
           ORDER BY created_at {order}, rowid {order}
           LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![exclude, pattern, limit as i64, skip as i64],
            RawUser::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total.max(0) as u64, rows))
      })
      .await?;

    let users = raws
      .into_iter()
      .map(RawUser::into_user)
      .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(users, skip, total))
  }

  // ── Threads ───────────────────────────────────────────────────────────────

  async fn create_thread(&self, input: NewThread) -> Result<Thread> {
    self.require_user(input.author_id).await?;

    let thread = Thread {
      thread_id:    Uuid::new_v4(),
      text:         input.text,
      author_id:    input.author_id,
      parent_id:    None,
      community_id: None,
      children:     Vec::new(),
      created_at:   now(),
    };

    // Two independent writes: the thread, then the author's list.
    self.insert_thread(&thread).await?;
    self
      .push_id("users", "threads", "user_id", thread.author_id, thread.thread_id)
      .await?;

    Ok(thread)
  }

  async fn list_top_level_threads(&self, page: PageRequest) -> Result<Page<FeedPost>> {
    let skip  = page.skip();
    let limit = page.limit();

    let (total, raws): (u64, Vec<RawThread>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM threads WHERE parent_id IS NULL",
          [],
          |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {THREAD_COLUMNS} FROM threads
           WHERE parent_id IS NULL
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![limit as i64, skip as i64],
            RawThread::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total.max(0) as u64, rows))
      })
      .await?;

    let threads = raws
      .into_iter()
      .map(RawThread::into_thread)
      .collect::<Result<Vec<_>>>()?;

    let author_ids: Vec<Uuid> = threads.iter().map(|t| t.author_id).collect();
    let authors = self.users_by_ids(&author_ids).await?;
    let replies = self.replies_for(&threads).await?;

    let posts = threads
      .into_iter()
      .zip(replies)
      .map(|(thread, replies)| -> Result<FeedPost> {
        // Several posts may share an author.
        let author = authors
          .get(&thread.author_id)
          .cloned()
          .ok_or(threads_core::Error::UserNotFound(thread.author_id))?;
        Ok(FeedPost { thread, author, replies })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(posts, skip, total))
  }

  async fn get_thread(&self, id: Uuid) -> Result<Option<ThreadDetail>> {
    let thread = match self.get_thread_doc(id).await? {
      Some(t) => t,
      None    => return Ok(None),
    };

    let author = self.require_user(thread.author_id).await?.summary();
    let comments = self
      .comments_for(std::slice::from_ref(&thread))
      .await?
      .pop()
      .unwrap_or_default();

    Ok(Some(ThreadDetail { thread, author, comments }))
  }

  async fn add_comment(&self, input: NewComment) -> Result<Thread> {
    if self.get_thread_doc(input.thread_id).await?.is_none() {
      return Err(threads_core::Error::ThreadNotFound(input.thread_id).into());
    }
    self.require_user(input.author_id).await?;

    let comment = Thread {
      thread_id:    Uuid::new_v4(),
      text:         input.text,
      author_id:    input.author_id,
      parent_id:    Some(input.thread_id),
      community_id: None,
      children:     Vec::new(),
      created_at:   now(),
    };

    // Two independent writes: the comment, then the parent's children.
    self.insert_thread(&comment).await?;
    self
      .push_id("threads", "children", "thread_id", input.thread_id, comment.thread_id)
      .await?;

    Ok(comment)
  }

  // ── Activity ──────────────────────────────────────────────────────────────

  async fn get_activity(&self, user_id: Uuid) -> Result<Vec<Reply>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawThread> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {THREAD_COLUMNS} FROM threads
           WHERE author_id != ?1
             AND thread_id IN (
               SELECT j.value
               FROM threads p, json_each(p.children) j
               WHERE p.author_id = ?1
             )
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], RawThread::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let replies = raws
      .into_iter()
      .map(RawThread::into_thread)
      .collect::<Result<Vec<_>>>()?;

    self.with_authors(replies).await
  }
}
