//! The single error kind surfaced by every action.

use thiserror::Error;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failed action: what was being attempted, and why it failed.
///
/// Callers are expected to display it, not branch on it.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct ActionError {
  pub context: &'static str,
  #[source]
  pub source:  BoxError,
}

/// No database connection exists when an action needs one, either because
/// no URL is configured or because connecting failed.
#[derive(Debug, Error)]
#[error("database is not connected")]
pub struct NotConnected;

pub type Result<T, E = ActionError> = std::result::Result<T, E>;
