//! Session context.
//!
//! Supplies the current authenticated identity (or none) and the sign-in /
//! sign-out lifecycle. The only process-wide state is the session file:
//! signing in writes it, signing out removes it, and every CLI invocation
//! loads it once at startup. Views receive the [`Session`] as a value.

mod local;
mod remote;

pub use local::LocalIdentityProvider;
pub use remote::RemoteIdentityProvider;

use crate::error::{Result, TrackError};
use crate::model::Identity;
use crate::util::write_private_file;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Identity,
    /// Bearer token for the hosted backend. Local sessions have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Name of the identity provider that issued this session.
    pub provider: String,
}

impl Session {
    /// The owner id every gateway call is scoped to.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.identity.id
    }
}

/// Result of a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUp {
    /// Account created and signed in.
    SignedIn(Session),
    /// Account created; the provider wants the email confirmed before sign-in.
    ConfirmationRequired(Identity),
}

/// External identity provider.
pub trait IdentityProvider {
    /// Short provider name stored in the session file.
    fn name(&self) -> &'static str;

    /// Create an account.
    ///
    /// # Errors
    ///
    /// `AccountExists` if the email is taken, a validation error for bad input,
    /// or a store error if the provider is unreachable.
    fn sign_up(&mut self, email: &str, password: &str) -> Result<SignUp>;

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` if the pair is rejected, or a store error.
    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session>;

    /// Revoke a session with the provider.
    ///
    /// # Errors
    ///
    /// Returns a store error if the provider is unreachable.
    fn sign_out(&mut self, session: &Session) -> Result<()>;
}

/// Current session plus where it is persisted.
#[derive(Debug, Default)]
pub struct SessionContext {
    path: Option<PathBuf>,
    current: Option<Session>,
}

impl SessionContext {
    /// Load the session persisted at `path`, if any.
    ///
    /// A missing or unreadable file means nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures other than "not found".
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = load_session(&path)?;
        Ok(Self {
            path: Some(path),
            current,
        })
    }

    /// A context that never touches disk.
    #[must_use]
    pub fn ephemeral(current: Option<Session>) -> Self {
        Self {
            path: None,
            current,
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.current.as_ref().map(|s| &s.identity)
    }

    /// The active session.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when nobody is signed in.
    pub fn require(&self) -> Result<&Session> {
        self.current.as_ref().ok_or(TrackError::NotAuthenticated)
    }

    /// Drop a session that was issued by a different provider.
    pub fn retain_provider(&mut self, provider: &str) {
        if let Some(session) = &self.current {
            if session.provider != provider {
                warn!(
                    session_provider = %session.provider,
                    provider,
                    "Ignoring session from another backend"
                );
                self.current = None;
            }
        }
    }

    /// Sign up, and begin a session when the provider allows it.
    ///
    /// # Errors
    ///
    /// Propagates provider errors, or I/O errors persisting the session.
    pub fn sign_up(
        &mut self,
        provider: &mut dyn IdentityProvider,
        email: &str,
        password: &str,
    ) -> Result<SignUp> {
        let outcome = provider.sign_up(email, password)?;
        if let SignUp::SignedIn(session) = &outcome {
            self.begin(session.clone())?;
        }
        Ok(outcome)
    }

    /// Sign in and persist the session.
    ///
    /// # Errors
    ///
    /// Propagates provider errors, or I/O errors persisting the session.
    pub fn sign_in(
        &mut self,
        provider: &mut dyn IdentityProvider,
        email: &str,
        password: &str,
    ) -> Result<&Session> {
        let session = provider.sign_in(email, password)?;
        self.begin(session)?;
        self.require()
    }

    /// Sign out: revoke with the provider, then remove the persisted session.
    ///
    /// Returns `false` if nobody was signed in. Local teardown happens even
    /// when the provider call fails.
    ///
    /// # Errors
    ///
    /// Returns the provider error after teardown, or an I/O error removing the file.
    pub fn sign_out(&mut self, provider: &mut dyn IdentityProvider) -> Result<bool> {
        let Some(session) = self.current.take() else {
            return Ok(false);
        };

        let revoked = provider.sign_out(&session);
        if let Some(path) = &self.path {
            clear_session(path)?;
        }
        info!(email = %session.identity.email, "Signed out");
        revoked.map(|()| true)
    }

    fn begin(&mut self, session: Session) -> Result<()> {
        if let Some(path) = &self.path {
            save_session(path, &session)?;
        }
        info!(email = %session.identity.email, provider = %session.provider, "Signed in");
        self.current = Some(session);
        Ok(())
    }
}

/// Read a persisted session.
///
/// # Errors
///
/// Returns an I/O error other than "not found".
pub fn load_session(path: &Path) -> Result<Option<Session>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str(&contents) {
        Ok(session) => {
            debug!(path = %path.display(), "Loaded session");
            Ok(Some(session))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
            Ok(None)
        }
    }
}

/// Persist a session, readable only by the current user.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_session(path: &Path, session: &Session) -> Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    write_private_file(path, &json)?;
    Ok(())
}

/// Remove a persisted session. Returns whether a file was removed.
///
/// # Errors
///
/// Returns an I/O error other than "not found".
pub fn clear_session(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
