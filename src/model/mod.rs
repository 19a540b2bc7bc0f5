//! Core data types for `issuetrack`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Issue` - The tracked work item
//! - `Status` - Issue lifecycle states
//! - `NewIssue` - Client-supplied fields for creation
//! - `IssuePatch` - Partial field changes for an update
//! - `Identity` - The authenticated user as reported by the identity provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Issue lifecycle status.
///
/// Serialized with the hosted table's values: `"Open"`, `"In Progress"`, `"Closed"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl Status {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }

    /// Label for the status menu entry ("Mark as ...").
    #[must_use]
    pub const fn action_label(&self) -> &'static str {
        match self {
            Self::Open => "Mark as Open",
            Self::InProgress => "Mark as In Progress",
            Self::Closed => "Mark as Closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = crate::error::TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "in progress" | "inprogress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            _ => Err(crate::error::TrackError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// The primary issue entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Store-assigned identifier.
    pub id: String,

    pub title: String,

    pub description: String,

    /// Workflow status.
    #[serde(default)]
    pub status: Status,

    /// Creation timestamp, assigned by the store.
    pub created_at: DateTime<Utc>,

    /// Identity that created the issue. The hosted table calls this `user_id`.
    #[serde(alias = "user_id")]
    pub owner_id: String,
}

/// Fields supplied by the client when creating an issue.
///
/// The store assigns `id`, `created_at`, and `owner_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Status,
}

impl NewIssue {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status,
        }
    }
}

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl IssuePatch {
    /// Patch that only changes the status.
    #[must_use]
    pub const fn status(status: Status) -> Self {
        Self {
            title: None,
            description: None,
            status: Some(status),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// The authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
