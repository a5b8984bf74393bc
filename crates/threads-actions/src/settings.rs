//! Process configuration.
//!
//! Values come from an optional TOML file, overridden by `THREADS_*`
//! environment variables (e.g. `THREADS_DATABASE_URL`).

use std::path::Path;

use serde::Deserialize;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "threads.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
  /// Connection string for the document store. When absent, connecting is a
  /// no-op and every action fails with [`crate::NotConnected`].
  #[serde(default)]
  pub database_url: Option<String>,
}

impl Settings {
  /// Load settings from `file` (or [`DEFAULT_CONFIG_FILE`]) and the
  /// environment. A missing file is not an error.
  pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
    let file = file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("THREADS"))
      .build()?
      .try_deserialize()
  }
}
