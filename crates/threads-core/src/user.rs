//! User documents and the restricted author projection used when populating
//! thread references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::thread::{Reply, Thread};

// ─── User ────────────────────────────────────────────────────────────────────

/// A forum member, keyed externally by the identity provider's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Document id; the target of every thread `author` reference.
  pub user_id:     Uuid,
  /// Stable id issued by the identity provider. Unique.
  pub identity_id: String,
  /// Unique handle, always stored lower-cased.
  pub username:    String,
  pub name:        String,
  pub bio:         String,
  /// Profile image URL.
  pub image:       String,
  pub onboarded:   bool,
  /// Ids of top-level threads this user created, oldest first.
  pub threads:     Vec<Uuid>,
  pub created_at:  DateTime<Utc>,
}

impl User {
  pub fn summary(&self) -> AuthorSummary {
    AuthorSummary {
      user_id:     self.user_id,
      identity_id: self.identity_id.clone(),
      name:        self.name.clone(),
      image:       self.image.clone(),
    }
  }
}

/// Input to [`crate::store::ForumStore::upsert_user`].
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
  pub identity_id: String,
  /// Lower-cased by the store before it is written.
  pub username:    String,
  pub name:        String,
  pub bio:         String,
  pub image:       String,
}

// ─── Projections ─────────────────────────────────────────────────────────────

/// The author fields exposed on populated replies and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
  pub user_id:     Uuid,
  pub identity_id: String,
  pub name:        String,
  pub image:       String,
}

/// Result of [`crate::store::ForumStore::list_threads_for_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserThreads {
  pub user:    User,
  pub threads: Vec<OwnedThread>,
}

/// One of a user's own threads with its direct replies populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedThread {
  pub thread:  Thread,
  pub replies: Vec<Reply>,
}
