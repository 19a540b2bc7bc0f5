//! Local issue collection kept in step with the store.
//!
//! Mutations are applied locally only after the gateway confirms them.
//! A failed call leaves the collection as it was and raises an error
//! notice; [`IssueList::refresh`] is the only recovery path.

use super::notice::Notice;
use crate::error::{Result, StoreError, TrackError};
use crate::gateway::IssueGateway;
use crate::model::{Issue, IssuePatch, NewIssue, Status};
use crate::session::Session;
use crate::validation::IssueValidator;
use tracing::{debug, error};

/// Mirror of an owner's issues, newest first.
#[derive(Debug)]
pub struct IssueList<G> {
    gateway: G,
    owner_id: String,
    issues: Vec<Issue>,
    loading: bool,
    notices: Vec<Notice>,
    fetch_failed_message: &'static str,
    mount_error: Option<TrackError>,
}

impl<G: IssueGateway> IssueList<G> {
    /// Check the session and load the owner's issues.
    ///
    /// A failed fetch does not fail the mount: the list stays empty and an
    /// error notice is raised.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when there is no session.
    pub fn mount(
        gateway: G,
        session: Option<&Session>,
        fetch_failed_message: &'static str,
    ) -> Result<Self> {
        let session = session.ok_or(TrackError::NotAuthenticated)?;
        let mut list = Self {
            gateway,
            owner_id: session.owner_id().to_string(),
            issues: Vec::new(),
            loading: true,
            notices: Vec::new(),
            fetch_failed_message,
            mount_error: None,
        };
        if let Err(err) = list.refresh() {
            list.mount_error = Some(err);
        }
        Ok(list)
    }

    /// Re-fetch and replace the local collection wholesale.
    ///
    /// # Errors
    ///
    /// Returns the store error; the previous collection is kept.
    pub fn refresh(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.gateway.list(&self.owner_id);
        self.loading = false;

        match result {
            Ok(issues) => {
                debug!(count = issues.len(), "Fetched issues");
                self.issues = issues;
                Ok(())
            }
            Err(e) => Err(self.fail(self.fetch_failed_message.to_string(), e)),
        }
    }

    /// Insert a validated draft and prepend the stored issue.
    ///
    /// # Errors
    ///
    /// Validation errors (nothing sent) or the store error.
    pub fn create(&mut self, new_issue: &NewIssue) -> Result<&Issue> {
        let clean = match IssueValidator::validate_new(new_issue) {
            Ok(clean) => clean,
            Err(errors) => return Err(self.reject(TrackError::from_validation_errors(errors))),
        };

        match self.gateway.create(&self.owner_id, &clean) {
            Ok(issue) => {
                self.issues.insert(0, issue);
                self.notices.push(Notice::success("Issue created successfully"));
                Ok(&self.issues[0])
            }
            Err(e) => {
                let message = format!("Failed to create issue: {}", store_message(&e));
                Err(self.fail(message, e))
            }
        }
    }

    /// Apply a patch and replace the matching local entry.
    ///
    /// # Errors
    ///
    /// Validation errors (nothing sent) or the store error.
    pub fn update_issue(&mut self, issue_id: &str, patch: &IssuePatch) -> Result<&Issue> {
        let clean = match IssueValidator::validate_patch(patch) {
            Ok(clean) => clean,
            Err(errors) => return Err(self.reject(TrackError::from_validation_errors(errors))),
        };

        match self.gateway.update(&self.owner_id, issue_id, &clean) {
            Ok(updated) => {
                let idx = match self.issues.iter().position(|i| i.id == updated.id) {
                    Some(idx) => {
                        self.issues[idx] = updated;
                        idx
                    }
                    None => {
                        // Not in our snapshot (created elsewhere); keep it visible.
                        self.issues.insert(0, updated);
                        0
                    }
                };
                self.notices.push(Notice::success("Issue updated successfully"));
                Ok(&self.issues[idx])
            }
            Err(e) => Err(self.fail("Failed to update issue".to_string(), e)),
        }
    }

    /// Change only the status.
    ///
    /// # Errors
    ///
    /// See [`IssueList::update_issue`].
    pub fn set_status(&mut self, issue_id: &str, status: Status) -> Result<&Issue> {
        self.update_issue(issue_id, &IssuePatch::status(status))
    }

    /// Delete and drop the matching local entry.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    pub fn delete(&mut self, issue_id: &str) -> Result<()> {
        match self.gateway.delete(&self.owner_id, issue_id) {
            Ok(()) => {
                self.issues.retain(|i| i.id != issue_id);
                self.notices.push(Notice::success("Issue deleted successfully"));
                Ok(())
            }
            Err(e) => Err(self.fail("Failed to delete issue".to_string(), e)),
        }
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Local entries with the given status, in list order.
    pub fn with_status(&self, status: Status) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.status == status)
    }

    #[must_use]
    pub fn get(&self, issue_id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == issue_id)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.id.clone()).collect()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The error from the initial fetch, if it failed. Taken once.
    pub fn take_mount_error(&mut self) -> Option<TrackError> {
        self.mount_error.take()
    }

    /// Hand over the pending notices, leaving none.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    fn fail(&mut self, message: String, err: StoreError) -> TrackError {
        error!(error = %err, %message, "Store call failed");
        self.notices.push(Notice::error(message));
        err.into()
    }

    pub(super) fn reject(&mut self, err: TrackError) -> TrackError {
        debug!(error = %err, "Draft rejected before sending");
        self.notices.push(Notice::error(err.to_string()));
        err
    }
}

/// The store's own wording, without our prefixes.
fn store_message(err: &StoreError) -> String {
    match err {
        StoreError::Api { message, .. } | StoreError::Unauthorized { message } => message.clone(),
        other => other.to_string(),
    }
}
