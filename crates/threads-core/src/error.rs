//! Error types for `threads-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("thread not found: {0}")]
  ThreadNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("unknown sort order: {0:?}")]
  UnknownSortOrder(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
