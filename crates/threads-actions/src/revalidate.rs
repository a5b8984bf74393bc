//! Cache revalidation signal.
//!
//! After a write that changes visible content, the action layer names the
//! logical path whose rendered view is now stale. Whatever caches rendered
//! views implements [`Revalidate`]; this crate does not cache anything.

pub trait Revalidate: Send + Sync {
  fn revalidate_path(&self, path: &str);
}

/// Ignores every signal. For callers with no rendered views to refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRevalidator;

impl Revalidate for NoopRevalidator {
  fn revalidate_path(&self, _path: &str) {}
}

/// Logs each revalidated path at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRevalidator;

impl Revalidate for TracingRevalidator {
  fn revalidate_path(&self, path: &str) {
    tracing::info!(path, "revalidate");
  }
}
