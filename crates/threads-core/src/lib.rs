//! Core types and trait definitions for the Threads forum.
//!
//! This crate is deliberately free of database dependencies. The storage
//! backend and the action layer both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod page;
pub mod store;
pub mod thread;
pub mod user;

pub use error::{Error, Result};
