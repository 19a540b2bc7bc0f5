//! Accounts kept in the local `SQLite` database.

use super::{IdentityProvider, Session, SignUp};
use crate::error::{Result, TrackError};
use crate::storage::SqliteStorage;
use crate::util::{hash_password, verify_password};
use crate::validation::CredentialValidator;
use tracing::debug;

/// Identity provider backed by the `users` table.
#[derive(Debug)]
pub struct LocalIdentityProvider<'a> {
    storage: &'a mut SqliteStorage,
}

impl<'a> LocalIdentityProvider<'a> {
    #[must_use]
    pub fn new(storage: &'a mut SqliteStorage) -> Self {
        Self { storage }
    }
}

impl IdentityProvider for LocalIdentityProvider<'_> {
    fn name(&self) -> &'static str {
        "local"
    }

    fn sign_up(&mut self, email: &str, password: &str) -> Result<SignUp> {
        let email = CredentialValidator::validate(email, password)?;
        if self.storage.find_user_by_email(&email)?.is_some() {
            return Err(TrackError::AccountExists { email });
        }

        let password_hash = hash_password(password)?;
        let identity = self.storage.create_user(&email, &password_hash)?;

        Ok(SignUp::SignedIn(Session {
            identity,
            access_token: None,
            provider: self.name().to_string(),
        }))
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        let Some(record) = self.storage.find_user_by_email(&email)? else {
            debug!(%email, "No local account");
            return Err(TrackError::InvalidCredentials);
        };

        if !verify_password(password, &record.password_hash) {
            return Err(TrackError::InvalidCredentials);
        }

        Ok(Session {
            identity: record.identity,
            access_token: None,
            provider: self.name().to_string(),
        })
    }

    fn sign_out(&mut self, _session: &Session) -> Result<()> {
        Ok(())
    }
}
