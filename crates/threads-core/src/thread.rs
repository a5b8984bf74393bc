//! Thread documents and their populated read models.
//!
//! A comment is a thread with a parent. Children are only ever appended, so
//! the parent chain cannot cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{AuthorSummary, User};

// ─── Thread ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
  pub thread_id:    Uuid,
  pub text:         String,
  /// Document id of the authoring [`User`].
  pub author_id:    Uuid,
  /// `None` for a top-level thread, the replied-to thread for a comment.
  pub parent_id:    Option<Uuid>,
  /// Always `None`; communities are not implemented.
  pub community_id: Option<Uuid>,
  /// Direct replies, oldest first.
  pub children:     Vec<Uuid>,
  pub created_at:   DateTime<Utc>,
}

impl Thread {
  pub fn is_top_level(&self) -> bool { self.parent_id.is_none() }
}

/// Input to [`crate::store::ForumStore::create_thread`].
#[derive(Debug, Clone)]
pub struct NewThread {
  pub text:         String,
  pub author_id:    Uuid,
  /// Accepted for interface compatibility and discarded by the store.
  pub community_id: Option<Uuid>,
}

/// Input to [`crate::store::ForumStore::add_comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
  pub thread_id: Uuid,
  pub author_id: Uuid,
  pub text:      String,
}

// ─── Populated views ─────────────────────────────────────────────────────────

/// A thread with its author populated. Its own children stay as ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
  pub thread: Thread,
  pub author: AuthorSummary,
}

/// A thread with its author and one level of replies populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub thread:  Thread,
  pub author:  AuthorSummary,
  pub replies: Vec<Reply>,
}

/// A single thread with two levels of children populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadDetail {
  pub thread:   Thread,
  pub author:   AuthorSummary,
  pub comments: Vec<Comment>,
}

/// A top-level thread as shown in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
  pub thread:  Thread,
  pub author:  User,
  pub replies: Vec<Reply>,
}
