//! Command implementations.
//!
//! Each command loads settings and the persisted session, mounts the view
//! it needs, performs at most one mutation, and prints the result.

pub mod auth;
pub mod create;
pub mod delete;
pub mod list;
pub mod profile;
pub mod update;
pub mod whoami;

use crate::config::{CliOverrides, Settings};
use crate::error::Result;
use crate::gateway::IssueGateway;
use crate::model::Status;
use crate::output::OutputContext;
use crate::session::SessionContext;
use crate::view::{IssueBoard, ProfileView};

/// Gateway type the commands drive.
pub type DynGateway = Box<dyn IssueGateway>;

/// Settings, session, and output mode for one invocation.
#[derive(Debug)]
pub struct CommandContext {
    pub settings: Settings,
    pub session: SessionContext,
    pub out: OutputContext,
}

impl CommandContext {
    /// Resolve configuration and load the persisted session.
    ///
    /// A session issued by the other backend's identity provider is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the session file is unreadable.
    pub fn load(cli: &CliOverrides) -> Result<Self> {
        let settings = Settings::load(cli)?;
        let mut session = SessionContext::load(settings.session_file.clone())?;
        session.retain_provider(settings.backend.provider_name());
        let out = OutputContext::from_settings(&settings);
        Ok(Self {
            settings,
            session,
            out,
        })
    }

    /// Mount the dashboard. A failed initial fetch is an error here.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a session, or the fetch error.
    pub fn mount_board(&self) -> Result<IssueBoard<DynGateway>> {
        let session = self.session.require()?;
        let gateway = self.settings.open_gateway(Some(session))?;
        let mut board = IssueBoard::mount(gateway, Some(session))?;
        if let Some(err) = board.take_mount_error() {
            self.out.notices(&board.take_notices());
            return Err(err);
        }
        Ok(board)
    }

    /// Mount the profile. A failed initial fetch is an error here.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a session, or the fetch error.
    pub fn mount_profile(&self) -> Result<ProfileView<DynGateway>> {
        let session = self.session.require()?;
        let gateway = self.settings.open_gateway(Some(session))?;
        let mut profile = ProfileView::mount(gateway, Some(session))?;
        if let Some(err) = profile.take_mount_error() {
            self.out.notices(&profile.take_notices());
            return Err(err);
        }
        Ok(profile)
    }
}

/// Parse an optional `--status` value.
///
/// # Errors
///
/// `InvalidStatus` for anything other than open, in progress, or closed.
pub fn parse_status(value: Option<&str>) -> Result<Option<Status>> {
    value.map(str::parse).transpose()
}
