//! [`Forum`], the handle the presentation layer holds.

use std::{future::Future, sync::Arc};

use threads_store_sqlite::SqliteStore;

use crate::{
  error::BoxError,
  revalidate::Revalidate,
  ActionError, Database, NotConnected, Result,
};

/// Owns the connection manager and the revalidation sink. Cheap to share
/// behind an `Arc`; every action takes `&self`.
pub struct Forum {
  db:          Database,
  revalidator: Arc<dyn Revalidate>,
}

impl Forum {
  pub fn new(db: Database, revalidator: Arc<dyn Revalidate>) -> Self {
    Self { db, revalidator }
  }

  pub fn database(&self) -> &Database { &self.db }

  /// Connect if needed and hand out the store.
  pub(crate) async fn store(&self) -> Result<SqliteStore, NotConnected> {
    self.db.connect().await;
    self.db.store().cloned().ok_or(NotConnected)
  }

  pub(crate) fn revalidate(&self, path: &str) {
    self.revalidator.revalidate_path(path);
  }

  /// Run one action body, rewrapping its failure under `context`.
  pub(crate) async fn run<T>(
    &self,
    context: &'static str,
    body: impl Future<Output = Result<T, BoxError>>,
  ) -> Result<T> {
    body.await.map_err(|source| {
      tracing::warn!(error = %source, "{context}");
      ActionError { context, source }
    })
  }
}
