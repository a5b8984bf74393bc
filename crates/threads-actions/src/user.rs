//! User actions: profile upsert, lookup, profile threads tab, user search.

use threads_core::{
  page::Page,
  store::{ForumStore, UserSearch},
  user::{ProfileUpdate, User, UserThreads},
};

use crate::{Forum, Result};

/// The only path whose view is revalidated after a profile save.
pub const PROFILE_EDIT_PATH: &str = "/profile/edit";

impl Forum {
  /// Create or overwrite the profile for `update.identity_id` and mark the
  /// user onboarded. Revalidates `path` only when it is
  /// [`PROFILE_EDIT_PATH`].
  pub async fn upsert_user(&self, update: ProfileUpdate, path: &str) -> Result<User> {
    self
      .run("Error updating/creating user", async {
        let store = self.store().await?;
        tracing::debug!(identity_id = %update.identity_id, "upsert user");
        let user = store.upsert_user(update).await?;
        if path == PROFILE_EDIT_PATH {
          self.revalidate(path);
        }
        Ok(user)
      })
      .await
  }

  /// `None` when no user has this identity id.
  pub async fn get_user(&self, identity_id: &str) -> Result<Option<User>> {
    self
      .run("Failed to fetch user data", async {
        let store = self.store().await?;
        Ok(store.get_user(identity_id).await?)
      })
      .await
  }

  pub async fn list_threads_for_user(&self, identity_id: &str) -> Result<Option<UserThreads>> {
    self
      .run("Error fetching user threads", async {
        let store = self.store().await?;
        Ok(store.list_threads_for_user(identity_id).await?)
      })
      .await
  }

  pub async fn search_users(&self, query: &UserSearch) -> Result<Page<User>> {
    self
      .run("Error fetching users", async {
        let store = self.store().await?;
        Ok(store.search_users(query).await?)
      })
      .await
  }
}
