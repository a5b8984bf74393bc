//! Activity: replies other users left on a user's threads.

use threads_core::{store::ForumStore, thread::Reply};
use uuid::Uuid;

use crate::{Forum, Result};

impl Forum {
  /// Direct replies to anything `user_id` authored, excluding the user's own
  /// replies, newest first. Replies to those replies are not included.
  pub async fn get_activity(&self, user_id: Uuid) -> Result<Vec<Reply>> {
    self
      .run("Error getting activity", async {
        let store = self.store().await?;
        Ok(store.get_activity(user_id).await?)
      })
      .await
  }
}
