//! Dashboard: the owner's issue list plus the creation form.

use super::form::IssueForm;
use super::list::IssueList;
use crate::error::Result;
use crate::gateway::IssueGateway;
use crate::model::Issue;
use crate::session::Session;
use std::ops::{Deref, DerefMut};

/// Dashboard view model.
///
/// Derefs to [`IssueList`] for the shared list operations.
#[derive(Debug)]
pub struct IssueBoard<G> {
    list: IssueList<G>,
    form: IssueForm,
}

impl<G: IssueGateway> IssueBoard<G> {
    /// Mount the dashboard.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when there is no session.
    pub fn mount(gateway: G, session: Option<&Session>) -> Result<Self> {
        Ok(Self {
            list: IssueList::mount(gateway, session, "Failed to fetch issues")?,
            form: IssueForm::new(),
        })
    }

    #[must_use]
    pub const fn form(&self) -> &IssueForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut IssueForm {
        &mut self.form
    }

    /// Submit the form.
    ///
    /// On success the stored issue is prepended and the form reset. On any
    /// failure the draft stays so it can be corrected and resubmitted.
    ///
    /// # Errors
    ///
    /// Validation errors (nothing sent) or the store error.
    pub fn create(&mut self) -> Result<&Issue> {
        let new_issue = match self.form.submit() {
            Ok(new_issue) => new_issue,
            Err(err) => return Err(self.list.reject(err)),
        };

        self.list.create(&new_issue)?;
        self.form.reset();
        Ok(&self.list.issues()[0])
    }
}

impl<G> Deref for IssueBoard<G> {
    type Target = IssueList<G>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl<G> DerefMut for IssueBoard<G> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.list
    }
}
