use crate::model::{Identity, Issue};
use crate::view::{Notice, Transition};
use serde::Serialize;

/// Issue list for `list` and `profile`.
#[derive(Debug, Clone, Serialize)]
pub struct IssueListOutput<'a> {
    pub issues: Vec<&'a Issue>,
    pub count: usize,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub notices: &'a [Notice],
}

/// A single issue after `create` or `update`, with its status menu.
#[derive(Debug, Clone, Serialize)]
pub struct IssueOutput<'a> {
    pub issue: &'a Issue,
    pub transitions: Vec<Transition>,
    pub notices: &'a [Notice],
}

/// Result of `delete`.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedOutput<'a> {
    pub deleted: &'a str,
    pub notices: &'a [Notice],
}

/// Profile summary.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutput<'a> {
    pub identity: &'a Identity,
    pub member_since: String,
    pub issue_count: usize,
    pub issues: &'a [Issue],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub notices: &'a [Notice],
}

/// Current session, for `whoami` and `auth`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutput<'a> {
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<&'a Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'a str>,
    /// Set after sign-up when the provider wants the email confirmed first.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub confirmation_required: bool,
}
