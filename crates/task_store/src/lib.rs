//! User and task storage for Task Tracker.
//!
//! This crate provides the storage abstraction behind the Task Tracker
//! backend: a [`TaskStore`] trait covering user and task operations, an
//! in-memory implementation for testing, and a SQLite implementation for
//! production use.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
