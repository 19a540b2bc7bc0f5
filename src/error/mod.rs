//! Error types and handling for `issuetrack`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Two failure families matter to callers: validation (nothing was sent)
//!   and store failures (the gateway call failed)
//! - Provides recovery hints for user-facing errors
//! - Provides structured JSON output via [`StructuredError`]

mod structured;

pub use structured::{ErrorCode, StructuredError};

use thiserror::Error;

/// Failure reported by an issue gateway or identity provider backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Transport-level HTTP failure (connect, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The remote API rejected the credentials.
    #[error("Not authorized by the store: {message}")]
    Unauthorized { message: String },

    /// No row matched both the issue id and the owner.
    #[error("Issue not found: {id}")]
    NotFound { id: String },

    /// The store answered with a body we could not decode.
    #[error("Unexpected store response: {0}")]
    Decode(String),

    /// Every candidate id for a new row was already taken.
    #[error("Could not allocate a unique '{prefix}' id")]
    IdExhausted { prefix: String },
}

/// Primary error type for `issuetrack` operations.
#[derive(Error, Debug)]
pub enum TrackError {
    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {}", format_validation_errors(.errors))]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    // === Session Errors ===
    /// No active session.
    #[error("Not signed in: run 'it auth login' first")]
    NotAuthenticated,

    /// Email/password pair rejected.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Sign-up with an email that already has an account.
    #[error("An account already exists for {email}")]
    AccountExists { email: String },

    // === Store Errors ===
    /// Gateway or identity backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Issue missing from the owner's issues, with the ids they do have.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String, known: Vec<String> },

    // === Configuration Errors ===
    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for TrackError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(StoreError::Database(err))
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The reason for the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TrackError {
    /// True for failures caught before anything reached the store.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::ValidationErrors { .. } | Self::InvalidStatus { .. }
        )
    }

    /// True when the gateway or identity backend failed.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotAuthenticated => Some("Run: it auth login --email <email> --password <password>"),
            Self::InvalidCredentials => Some("Check the email and password, or run: it auth signup"),
            Self::AccountExists { .. } => Some("Run: it auth login"),
            Self::InvalidStatus { .. } => Some("Valid statuses: open, in_progress, closed"),
            Self::Store(StoreError::NotFound { .. }) | Self::IssueNotFound { .. } => {
                Some("Run 'it list' to see your issues")
            }
            Self::Store(StoreError::Unauthorized { .. }) => {
                Some("Your session may have expired. Run: it auth login")
            }
            _ => None,
        }
    }

    /// Attach the owner's known ids to a not-found store error so the
    /// report can suggest close matches. Other errors pass through.
    #[must_use]
    pub fn with_known_ids(self, known: Vec<String>) -> Self {
        match self {
            Self::Store(StoreError::NotFound { id }) => Self::IssueNotFound { id, known },
            other => other,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create from multiple validation errors.
    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `TrackError`.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Result type for gateway and identity backend calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
