//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

#![allow(clippy::option_if_let_else)]

use crate::error::{StoreError, TrackError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Machine-readable error codes.
///
/// Format: `SCREAMING_SNAKE_CASE` for easy parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Store Errors (exit code 2) ===
    /// Local database operation failed
    DatabaseError,
    /// Remote store could not be reached
    StoreUnavailable,
    /// Remote store answered with an error status
    StoreRejected,
    /// Remote store answered with an unreadable body
    StoreDecodeError,

    // === Issue Errors (exit code 3) ===
    /// No issue with this id for the current owner
    IssueNotFound,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,
    /// Invalid status value
    InvalidStatus,

    // === Session Errors (exit code 5) ===
    /// No active session
    NotAuthenticated,
    /// Credentials rejected
    InvalidCredentials,
    /// Account already exists
    AccountExists,
    /// Store refused the session token
    Unauthorized,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::StoreRejected => "STORE_REJECTED",
            Self::StoreDecodeError => "STORE_DECODE_ERROR",
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountExists => "ACCOUNT_EXISTS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Retryable means the caller might succeed if it:
    /// - Waits and retries (e.g., store unreachable)
    /// - Fixes the input and retries (e.g., validation error)
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable
                | Self::ValidationFailed
                | Self::InvalidStatus
                | Self::InvalidCredentials
                | Self::NotAuthenticated
        )
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Store errors
    /// - 3: Issue not found
    /// - 4: Validation errors
    /// - 5: Session errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DatabaseError
            | Self::StoreUnavailable
            | Self::StoreRejected
            | Self::StoreDecodeError => 2,
            Self::IssueNotFound => 3,
            Self::ValidationFailed | Self::InvalidStatus => 4,
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::AccountExists
            | Self::Unauthorized => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `TrackError`.
    #[must_use]
    pub fn from_error(err: &TrackError) -> Self {
        if let TrackError::IssueNotFound { id, known } = err {
            return Self::issue_not_found(id, known);
        }

        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Create a structured error with similar ID suggestions.
    #[must_use]
    pub fn issue_not_found(searched_id: &str, existing_ids: &[String]) -> Self {
        let similar = find_similar_ids(searched_id, existing_ids, 3);

        let hint = if similar.is_empty() {
            Some("Run 'it list' to see your issues.".to_string())
        } else if similar.len() == 1 {
            Some(format!("Did you mean '{}'?", similar[0]))
        } else {
            Some(format!("Did you mean one of: {}?", similar.join(", ")))
        };

        Self {
            code: ErrorCode::IssueNotFound,
            message: format!("Issue not found: {searched_id}"),
            hint,
            retryable: false,
            context: Some(json!({
                "searched_id": searched_id,
                "similar_ids": similar,
            })),
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &TrackError) -> (ErrorCode, Option<Value>) {
        match err {
            TrackError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            TrackError::ValidationErrors { errors } => (
                ErrorCode::ValidationFailed,
                Some(json!({
                    "errors": errors.iter()
                        .map(|e| json!({"field": e.field, "message": e.message}))
                        .collect::<Vec<_>>()
                })),
            ),
            TrackError::InvalidStatus { status } => (
                ErrorCode::InvalidStatus,
                Some(json!({
                    "provided": status,
                    "valid_values": ["open", "in_progress", "closed"],
                })),
            ),
            TrackError::NotAuthenticated => (ErrorCode::NotAuthenticated, None),
            TrackError::InvalidCredentials => (ErrorCode::InvalidCredentials, None),
            TrackError::AccountExists { email } => {
                (ErrorCode::AccountExists, Some(json!({"email": email})))
            }
            TrackError::Store(store) => match store {
                StoreError::Database(_) => (ErrorCode::DatabaseError, None),
                StoreError::IdExhausted { prefix } => {
                    (ErrorCode::DatabaseError, Some(json!({"prefix": prefix})))
                }
                StoreError::Http(_) => (ErrorCode::StoreUnavailable, None),
                StoreError::Api { status, .. } => {
                    (ErrorCode::StoreRejected, Some(json!({"status": status})))
                }
                StoreError::Unauthorized { .. } => (ErrorCode::Unauthorized, None),
                StoreError::NotFound { id } => {
                    (ErrorCode::IssueNotFound, Some(json!({"searched_id": id})))
                }
                StoreError::Decode(_) => (ErrorCode::StoreDecodeError, None),
            },
            TrackError::IssueNotFound { id, .. } => {
                (ErrorCode::IssueNotFound, Some(json!({"searched_id": id})))
            }
            TrackError::Config(_) => (ErrorCode::ConfigError, None),
            TrackError::Io(_) => (ErrorCode::IoError, None),
            TrackError::Json(_) => (ErrorCode::JsonError, None),
            TrackError::Yaml(_) => (ErrorCode::YamlError, None),
            TrackError::Other(_) => (ErrorCode::InternalError, None),
        }
    }

    fn generate_hint(err: &TrackError) -> Option<String> {
        if let TrackError::InvalidStatus { status } = err {
            if let Some(detected) = detect_status_intent(status) {
                return Some(format!("Did you mean --status {detected}?"));
            }
        }

        if let Some(suggestion) = err.suggestion() {
            return Some(suggestion.to_string());
        }

        match err {
            TrackError::Store(StoreError::Http(_)) => {
                Some("Check the rest.url setting and your network connection.".to_string())
            }
            TrackError::Validation { field, .. } => Some(format!("Provide a non-blank --{field}.")),
            _ => None,
        }
    }
}

// === Intent Detection ===

const VALID_STATUSES: [&str; 3] = ["open", "in_progress", "closed"];

/// Status synonyms for intent detection.
static STATUS_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("done", "closed"),
        ("complete", "closed"),
        ("completed", "closed"),
        ("finished", "closed"),
        ("resolved", "closed"),
        ("fixed", "closed"),
        ("wip", "in_progress"),
        ("working", "in_progress"),
        ("active", "in_progress"),
        ("started", "in_progress"),
        ("progress", "in_progress"),
        ("new", "open"),
        ("todo", "open"),
        ("pending", "open"),
        ("reopen", "open"),
    ]
    .into_iter()
    .collect()
});

/// Detect what status the user likely meant.
fn detect_status_intent(input: &str) -> Option<&'static str> {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some(&canonical) = STATUS_SYNONYMS.get(lower.as_str()) {
        return Some(canonical);
    }

    VALID_STATUSES
        .iter()
        .copied()
        .find(|status| status.starts_with(&lower))
}

// === Levenshtein Distance ===

/// Calculate the Levenshtein distance between two strings.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Find IDs similar to the searched ID using Levenshtein distance.
///
/// Returns up to `max_suggestions` IDs with distance <= 3.
#[must_use]
pub fn find_similar_ids(searched: &str, existing: &[String], max_suggestions: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|id| (levenshtein_distance(searched, id), id.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max_suggestions)
        .map(|(_, id)| id.to_string())
        .collect()
}
