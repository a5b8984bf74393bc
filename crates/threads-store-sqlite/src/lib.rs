//! SQLite backend for the Threads forum.
//!
//! Users and threads are stored as one row per document; reference lists
//! (a user's threads, a thread's children) live in JSON columns the way a
//! document store embeds them. All access goes through [`tokio_rusqlite`] so
//! queries run on a dedicated thread without blocking the async runtime.

mod encode;
mod populate;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
