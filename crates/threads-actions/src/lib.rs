//! In-process action layer for the Threads forum.
//!
//! This is the API surface the presentation layer calls. Each action connects
//! lazily, runs one store operation and signals revalidation when visible
//! content changed. Failures come back as a single [`ActionError`] carrying a
//! readable message.
//!
//! ```rust,ignore
//! let settings = Settings::load(None)?;
//! let forum = Forum::new(Database::from_settings(&settings), Arc::new(TracingRevalidator));
//! let feed = forum.list_top_level_threads(PageRequest::new(1, 30)).await?;
//! ```

pub mod activity;
pub mod connection;
pub mod error;
pub mod forum;
pub mod revalidate;
pub mod settings;
pub mod thread;
pub mod user;

pub use connection::Database;
pub use error::{ActionError, NotConnected, Result};
pub use forum::Forum;
pub use revalidate::{NoopRevalidator, Revalidate, TracingRevalidator};
pub use settings::Settings;

#[cfg(test)]
mod tests;
