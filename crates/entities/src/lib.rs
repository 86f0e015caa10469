//! Core entity definitions for Task Tracker.
//!
//! This crate defines the data types shared across the Task Tracker
//! backend: registered users and the tasks that can be assigned to them.

mod task;
mod user;

pub use task::*;
pub use user::*;
