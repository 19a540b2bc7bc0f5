//! Profile: identity summary plus the owner's issues.

use super::list::IssueList;
use crate::error::{Result, TrackError};
use crate::gateway::IssueGateway;
use crate::model::Identity;
use crate::session::Session;
use crate::util::time::format_long_date;
use std::ops::{Deref, DerefMut};

/// Profile view model.
///
/// Same list and mutations as the dashboard, without creation.
#[derive(Debug)]
pub struct ProfileView<G> {
    identity: Identity,
    list: IssueList<G>,
}

impl<G: IssueGateway> ProfileView<G> {
    /// Mount the profile.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when there is no session.
    pub fn mount(gateway: G, session: Option<&Session>) -> Result<Self> {
        let session = session.ok_or(TrackError::NotAuthenticated)?;
        let list = IssueList::mount(gateway, Some(session), "Failed to fetch your issues")?;
        Ok(Self {
            identity: session.identity.clone(),
            list,
        })
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.identity.email
    }

    /// Account creation date, e.g. `January 5, 2026`.
    #[must_use]
    pub fn member_since(&self) -> String {
        format_long_date(&self.identity.created_at)
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.list.issues().len()
    }
}

impl<G> Deref for ProfileView<G> {
    type Target = IssueList<G>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl<G> DerefMut for ProfileView<G> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.list
    }
}
