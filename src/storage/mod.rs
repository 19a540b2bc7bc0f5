//! `SQLite` storage layer.
//!
//! The local backend for both issue persistence and accounts.

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStorage, UserRecord};
