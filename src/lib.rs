//! `issuetrack`: a single-user issue tracker.
//!
//! Issues are owned by the signed-in identity and every store call is
//! filtered by that owner. Storage is either a local `SQLite` file or a
//! hosted PostgREST-style table API, both behind [`gateway::IssueGateway`].
//! The [`view`] models keep an in-memory copy of the owner's issues in
//! step with the store; the `it` binary drives them one command at a time.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod output;
pub mod session;
pub mod storage;
pub mod util;
pub mod validation;
pub mod view;

pub use error::{ErrorCode, Result, StoreError, StructuredError, TrackError};
