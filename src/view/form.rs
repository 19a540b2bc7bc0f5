//! Issue creation form.

use crate::error::{Result, TrackError};
use crate::model::{NewIssue, Status};
use crate::validation::IssueValidator;

/// Draft state for a new issue.
///
/// Defaults: empty title, empty description, `Open`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueForm {
    pub title: String,
    pub description: String,
    pub status: Status,
    open: bool,
}

impl IssueForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefilled form, as when the fields come from the command line.
    #[must_use]
    pub fn with_draft(title: impl Into<String>, description: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status,
            open: true,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Trim and validate the draft.
    ///
    /// The draft is left untouched either way; the caller resets it once
    /// the store has accepted the issue.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming each blank or oversized field.
    pub fn submit(&self) -> Result<NewIssue> {
        let draft = NewIssue::new(self.title.as_str(), self.description.as_str(), self.status);
        IssueValidator::validate_new(&draft).map_err(TrackError::from_validation_errors)
    }

    /// Restore the defaults and close.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Discard the draft.
    pub fn cancel(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_trims() {
        let form = IssueForm::with_draft(" Bug A ", " desc ", Status::InProgress);
        let new_issue = form.submit().unwrap();
        assert_eq!(new_issue, NewIssue::new("Bug A", "desc", Status::InProgress));
    }

    #[test]
    fn submit_rejects_blank_title() {
        let form = IssueForm::with_draft("   ", "desc", Status::Open);
        let err = form.submit().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation failed: title: cannot be empty");
    }

    #[test]
    fn cancel_restores_defaults() {
        let mut form = IssueForm::with_draft("t", "d", Status::Closed);
        assert!(form.is_open());
        form.cancel();
        assert_eq!(form, IssueForm::new());
        assert_eq!(form.status, Status::Open);
        assert!(!form.is_open());
    }
}
