//! Validation helpers for `issuetrack`.
//!
//! Everything here runs before a gateway call: a draft that fails
//! validation is never sent to the store.

use crate::error::{TrackError, ValidationError};
use crate::model::{IssuePatch, NewIssue};
use regex::Regex;
use std::sync::LazyLock;

const MAX_TITLE_LEN: usize = 500;
const MAX_DESCRIPTION_LEN: usize = 102_400;
const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|_| unreachable!())
});

/// Validates issue drafts and patches.
pub struct IssueValidator;

impl IssueValidator {
    /// Trim and validate a creation draft.
    ///
    /// Returns the trimmed draft on success.
    ///
    /// # Errors
    ///
    /// Returns every violated rule as a `ValidationError`.
    pub fn validate_new(draft: &NewIssue) -> Result<NewIssue, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let title = draft.title.trim();
        let description = draft.description.trim();

        check_text("title", title, MAX_TITLE_LEN, &mut errors);
        check_text("description", description, MAX_DESCRIPTION_LEN, &mut errors);

        if errors.is_empty() {
            Ok(NewIssue::new(title, description, draft.status))
        } else {
            Err(errors)
        }
    }

    /// Trim and validate the text fields a patch sets.
    ///
    /// Fields the patch leaves alone are not checked.
    ///
    /// # Errors
    ///
    /// Returns every violated rule as a `ValidationError`.
    pub fn validate_patch(patch: &IssuePatch) -> Result<IssuePatch, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let title = patch.title.as_deref().map(str::trim);
        let description = patch.description.as_deref().map(str::trim);

        if let Some(title) = title {
            check_text("title", title, MAX_TITLE_LEN, &mut errors);
        }
        if let Some(description) = description {
            check_text("description", description, MAX_DESCRIPTION_LEN, &mut errors);
        }

        if errors.is_empty() {
            Ok(IssuePatch {
                title: title.map(ToString::to_string),
                description: description.map(ToString::to_string),
                status: patch.status,
            })
        } else {
            Err(errors)
        }
    }
}

/// Validates sign-up and sign-in input.
pub struct CredentialValidator;

impl CredentialValidator {
    /// Check an email/password pair. The email is returned trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns a `TrackError` describing every violated rule.
    pub fn validate(email: &str, password: &str) -> Result<String, TrackError> {
        let mut errors = Vec::new();
        let email = email.trim().to_lowercase();

        if email.is_empty() {
            errors.push(ValidationError::new("email", "cannot be empty"));
        } else if !EMAIL_RE.is_match(&email) {
            errors.push(ValidationError::new("email", "is not a valid address"));
        }

        if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(ValidationError::new(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        if errors.is_empty() {
            Ok(email)
        } else {
            Err(TrackError::from_validation_errors(errors))
        }
    }
}

fn check_text(field: &str, value: &str, max_len: usize, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        errors.push(ValidationError::new(field, "cannot be empty"));
    } else if value.chars().count() > max_len {
        errors.push(ValidationError::new(
            field,
            format!("exceeds {max_len} characters"),
        ));
    }
}
