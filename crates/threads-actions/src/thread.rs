//! Thread actions: post, feed, thread view, comment.

use threads_core::{
  page::{Page, PageRequest},
  store::ForumStore,
  thread::{FeedPost, NewComment, NewThread, Thread, ThreadDetail},
};
use uuid::Uuid;

use crate::{Forum, Result};

impl Forum {
  /// Post a top-level thread and revalidate `path`.
  pub async fn create_thread(&self, input: NewThread, path: &str) -> Result<Thread> {
    self
      .run("Error creating thread", async {
        let store = self.store().await?;
        let thread = store.create_thread(input).await?;
        tracing::debug!(thread_id = %thread.thread_id, "created thread");
        self.revalidate(path);
        Ok(thread)
      })
      .await
  }

  pub async fn list_top_level_threads(&self, page: PageRequest) -> Result<Page<FeedPost>> {
    self
      .run("Error fetching posts", async {
        let store = self.store().await?;
        Ok(store.list_top_level_threads(page).await?)
      })
      .await
  }

  /// `None` when the thread does not exist.
  pub async fn get_thread_by_id(&self, id: Uuid) -> Result<Option<ThreadDetail>> {
    self
      .run("Failed to find thread", async {
        let store = self.store().await?;
        Ok(store.get_thread(id).await?)
      })
      .await
  }

  /// Reply to `input.thread_id` and revalidate `path`. Fails, without
  /// writing, when the thread does not exist.
  pub async fn add_comment(&self, input: NewComment, path: &str) -> Result<Thread> {
    self
      .run("Failed to comment in the thread", async {
        let store = self.store().await?;
        let comment = store.add_comment(input).await?;
        tracing::debug!(
          thread_id = %comment.thread_id,
          parent_id = ?comment.parent_id,
          "added comment"
        );
        self.revalidate(path);
        Ok(comment)
      })
      .await
  }
}
