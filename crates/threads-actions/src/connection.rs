//! Lazily-opened, process-wide database connection.

use threads_store_sqlite::SqliteStore;
use tokio::sync::OnceCell;

use crate::Settings;

/// Holds the connection string and, once connected, the store handle.
///
/// [`Database::connect`] is safe to call before every operation: the first
/// successful connect is kept for the life of the value and later calls
/// return immediately. Concurrent first calls are serialized by the cell, so
/// only one connect attempt is in flight at a time.
#[derive(Default)]
pub struct Database {
  url:   Option<String>,
  store: OnceCell<SqliteStore>,
}

impl Database {
  pub fn new(url: Option<String>) -> Self {
    Self { url, store: OnceCell::new() }
  }

  pub fn from_settings(settings: &Settings) -> Self {
    Self::new(settings.database_url.clone())
  }

  /// Ensure a connection exists.
  ///
  /// Never fails: a missing URL or a failed connect is logged and the
  /// problem surfaces later as [`crate::NotConnected`]. A failed attempt
  /// leaves nothing cached, so the next call tries again.
  pub async fn connect(&self) {
    let Some(url) = self.url.as_deref() else {
      tracing::warn!("database URL not configured");
      return;
    };

    if self.store.initialized() {
      tracing::debug!("already connected to database");
      return;
    }

    match self
      .store
      .get_or_try_init(|| SqliteStore::connect(url))
      .await
    {
      Ok(_) => tracing::info!("connected to database"),
      Err(e) => tracing::error!(error = %e, "failed to connect to database"),
    }
  }

  pub fn is_connected(&self) -> bool { self.store.initialized() }

  /// The open store, if [`Database::connect`] has succeeded.
  pub fn store(&self) -> Option<&SqliteStore> { self.store.get() }
}
