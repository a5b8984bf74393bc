//! The `ForumStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `threads-store-sqlite`).
//! The action layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  page::{Page, PageRequest, SortOrder},
  thread::{FeedPost, NewComment, NewThread, Reply, Thread, ThreadDetail},
  user::{ProfileUpdate, User, UserThreads},
};

pub const DEFAULT_USER_PAGE_SIZE: u32 = 20;
pub const DEFAULT_FEED_PAGE_SIZE: u32 = 30;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ForumStore::search_users`].
#[derive(Debug, Clone)]
pub struct UserSearch {
  /// The caller's identity id; never part of the results.
  pub exclude_identity_id: String,
  /// Case-insensitive substring matched against username or name. Ignored
  /// when blank.
  pub text:                String,
  pub page:                PageRequest,
  pub sort:                SortOrder,
}

impl UserSearch {
  /// First page of 20, newest users first, no text filter.
  pub fn new(exclude_identity_id: impl Into<String>) -> Self {
    Self {
      exclude_identity_id: exclude_identity_id.into(),
      text:                String::new(),
      page:                PageRequest::new(1, DEFAULT_USER_PAGE_SIZE),
      sort:                SortOrder::Desc,
    }
  }

  /// The text filter, or `None` when it is blank.
  pub fn filter(&self) -> Option<&str> {
    (!self.text.trim().is_empty()).then_some(self.text.as_str())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a forum document store with two collections, users and
/// threads.
///
/// Writes that touch two documents (a new thread and the list that links it)
/// are issued as two independent writes; a failure between them is not
/// rolled back.
pub trait ForumStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create the user for `update.identity_id` if absent, otherwise overwrite
  /// its profile fields. Either way the user ends up onboarded. The username
  /// is stored lower-cased.
  fn upsert_user(
    &self,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look up a user by identity id. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    identity_id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// A user with each owned thread and that thread's direct replies.
  /// Returns `None` if the user does not exist.
  fn list_threads_for_user<'a>(
    &'a self,
    identity_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserThreads>, Self::Error>> + Send + 'a;

  /// Page through every user except the caller, optionally filtered by text.
  fn search_users<'a>(
    &'a self,
    query: &'a UserSearch,
  ) -> impl Future<Output = Result<Page<User>, Self::Error>> + Send + 'a;

  // ── Threads ───────────────────────────────────────────────────────────

  /// Insert a top-level thread and append it to the author's thread list.
  fn create_thread(
    &self,
    input: NewThread,
  ) -> impl Future<Output = Result<Thread, Self::Error>> + Send + '_;

  /// Top-level threads, newest first.
  fn list_top_level_threads(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<FeedPost>, Self::Error>> + Send + '_;

  /// A thread with two levels of children. Returns `None` if not found.
  fn get_thread(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ThreadDetail>, Self::Error>> + Send + '_;

  /// Insert a reply to `input.thread_id` and append it to the parent's
  /// children.
  ///
  /// Unlike [`ForumStore::get_thread`], a missing parent is an error, and no
  /// document is written in that case.
  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Thread, Self::Error>> + Send + '_;

  // ── Activity ──────────────────────────────────────────────────────────

  /// Direct replies to threads authored by `user_id`, excluding the user's
  /// own replies, newest first.
  fn get_activity(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Reply>, Self::Error>> + Send + '_;
}
