//! Hosted table backend (PostgREST conventions).
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list      | `GET    /rest/v1/{table}?select=*&user_id=eq.{owner}&order=created_at.desc` |
//! | create    | `POST   /rest/v1/{table}` with `Prefer: return=representation` |
//! | update    | `PATCH  /rest/v1/{table}?id=eq.{id}&user_id=eq.{owner}` |
//! | delete    | `DELETE /rest/v1/{table}?id=eq.{id}&user_id=eq.{owner}` |
//!
//! Update and delete ask for the affected rows back; an empty array means
//! no row matched both id and owner.

use super::IssueGateway;
use super::http::{build_client, check_response, encode, read_json, with_auth};
use crate::error::{StoreError, StoreResult};
use crate::model::{Issue, IssuePatch, NewIssue, Status};
use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Public (anon) API key.
    pub api_key: String,
    /// Table holding the issues.
    pub table: String,
    pub timeout: Duration,
}

impl RestConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: "issues".to_string(),
            timeout: super::http::DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url(), self.table)
    }
}

/// Row shape returned by the hosted table.
///
/// `id` may be a uuid string or a bigint depending on the table definition.
#[derive(Debug, Deserialize)]
struct RestRow {
    id: Value,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<Status>,
    created_at: DateTime<Utc>,
    user_id: String,
}

impl RestRow {
    fn into_issue(self) -> Issue {
        let id = match self.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        Issue {
            id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            created_at: self.created_at,
            owner_id: self.user_id,
        }
    }
}

/// Issue gateway over the hosted table API.
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: Client,
    config: RestConfig,
    access_token: Option<String>,
}

impl RestGateway {
    /// Create a gateway. `access_token` is the signed-in session's JWT.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Http` if the HTTP client cannot be built.
    pub fn new(config: RestConfig, access_token: Option<String>) -> StoreResult<Self> {
        let client = build_client(config.timeout)?;
        Ok(Self {
            client,
            config,
            access_token,
        })
    }

    fn request(&self, method: Method, query: &str) -> RequestBuilder {
        let url = if query.is_empty() {
            self.config.table_url()
        } else {
            format!("{}?{query}", self.config.table_url())
        };
        debug!(%method, %url, "Store request");
        with_auth(
            self.client.request(method, url),
            &self.config.api_key,
            self.access_token.as_deref(),
        )
    }

    fn scoped_query(owner_id: &str, issue_id: &str) -> String {
        format!("id=eq.{}&user_id=eq.{}", encode(issue_id), encode(owner_id))
    }

    fn send_for_rows(builder: RequestBuilder) -> StoreResult<Vec<Issue>> {
        let resp = check_response(builder.send()?)?;
        let rows: Vec<RestRow> = read_json(resp)?;
        Ok(rows.into_iter().map(RestRow::into_issue).collect())
    }

    fn first_or_not_found(rows: Vec<Issue>, issue_id: &str) -> StoreResult<Issue> {
        rows.into_iter().next().ok_or_else(|| StoreError::NotFound {
            id: issue_id.to_string(),
        })
    }
}

impl IssueGateway for RestGateway {
    fn list(&self, owner_id: &str) -> StoreResult<Vec<Issue>> {
        let query = format!(
            "select=*&user_id=eq.{}&order=created_at.desc",
            encode(owner_id)
        );
        Self::send_for_rows(self.request(Method::GET, &query))
    }

    fn create(&mut self, owner_id: &str, new_issue: &NewIssue) -> StoreResult<Issue> {
        let body = json!([{
            "title": new_issue.title,
            "description": new_issue.description,
            "status": new_issue.status,
            "user_id": owner_id,
        }]);
        let rows = Self::send_for_rows(
            self.request(Method::POST, "")
                .header("Prefer", "return=representation")
                .json(&body),
        )?;
        let issue = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))?;
        info!(id = %issue.id, "Created issue");
        Ok(issue)
    }

    fn update(&mut self, owner_id: &str, issue_id: &str, patch: &IssuePatch) -> StoreResult<Issue> {
        let scope = Self::scoped_query(owner_id, issue_id);

        if patch.is_empty() {
            let rows = Self::send_for_rows(self.request(Method::GET, &format!("select=*&{scope}")))?;
            return Self::first_or_not_found(rows, issue_id);
        }

        let rows = Self::send_for_rows(
            self.request(Method::PATCH, &scope)
                .header("Prefer", "return=representation")
                .json(patch),
        )?;
        Self::first_or_not_found(rows, issue_id)
    }

    fn delete(&mut self, owner_id: &str, issue_id: &str) -> StoreResult<()> {
        let rows = Self::send_for_rows(
            self.request(Method::DELETE, &Self::scoped_query(owner_id, issue_id))
                .header("Prefer", "return=representation"),
        )?;
        Self::first_or_not_found(rows, issue_id).map(|_| ())
    }
}
