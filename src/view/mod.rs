//! View models.
//!
//! Each view holds the owner's issues as last confirmed by the store, a
//! loading flag, and the notices raised by user actions. They perform no
//! rendering; the CLI turns them into text or JSON.

mod board;
mod form;
mod list;
mod notice;
mod profile;

pub use board::IssueBoard;
pub use form::IssueForm;
pub use list::IssueList;
pub use notice::{Notice, NoticeLevel};
pub use profile::ProfileView;

use crate::model::Status;
use serde::Serialize;

/// One entry of the status menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub target: Status,
    pub label: &'static str,
    /// False for the issue's current status.
    pub enabled: bool,
}

/// The "Mark as ..." menu for an issue currently in `current`.
#[must_use]
pub fn available_transitions(current: Status) -> [Transition; 3] {
    Status::ALL.map(|target| Transition {
        target,
        label: target.action_label(),
        enabled: target != current,
    })
}
