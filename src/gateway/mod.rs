//! Issue store gateway.
//!
//! Four single-round-trip operations against one logical table. Every
//! call carries the owner id as an equality predicate: a row owned by
//! someone else is invisible, so it can be neither read nor changed.

pub mod http;
pub mod rest;

pub use rest::{RestConfig, RestGateway};

use crate::error::StoreResult;
use crate::model::{Issue, IssuePatch, NewIssue};

/// Owner-scoped CRUD over the issue table.
///
/// Implementations perform no validation and no retries.
pub trait IssueGateway {
    /// Issues owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the store cannot be read.
    fn list(&self, owner_id: &str) -> StoreResult<Vec<Issue>>;

    /// Insert a new row owned by `owner_id` and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the insert fails.
    fn create(&mut self, owner_id: &str, new_issue: &NewIssue) -> StoreResult<Issue>;

    /// Apply `patch` to the row matching both `issue_id` and `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row matches both, or another
    /// `StoreError` if the write fails.
    fn update(&mut self, owner_id: &str, issue_id: &str, patch: &IssuePatch) -> StoreResult<Issue>;

    /// Remove the row matching both `issue_id` and `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row matches both, or another
    /// `StoreError` if the delete fails.
    fn delete(&mut self, owner_id: &str, issue_id: &str) -> StoreResult<()>;
}

impl<G: IssueGateway + ?Sized> IssueGateway for Box<G> {
    fn list(&self, owner_id: &str) -> StoreResult<Vec<Issue>> {
        (**self).list(owner_id)
    }

    fn create(&mut self, owner_id: &str, new_issue: &NewIssue) -> StoreResult<Issue> {
        (**self).create(owner_id, new_issue)
    }

    fn update(&mut self, owner_id: &str, issue_id: &str, patch: &IssuePatch) -> StoreResult<Issue> {
        (**self).update(owner_id, issue_id, patch)
    }

    fn delete(&mut self, owner_id: &str, issue_id: &str) -> StoreResult<()> {
        (**self).delete(owner_id, issue_id)
    }
}
