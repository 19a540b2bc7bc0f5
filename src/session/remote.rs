//! Password grant against the hosted auth API (GoTrue conventions).
//!
//! - sign up: `POST /auth/v1/signup`
//! - sign in: `POST /auth/v1/token?grant_type=password`
//! - sign out: `POST /auth/v1/logout` with the session's bearer token

use super::{IdentityProvider, Session, SignUp};
use crate::error::{Result, StoreError, TrackError};
use crate::gateway::RestConfig;
use crate::gateway::http::{build_client, check_response, read_json, with_auth};
use crate::model::Identity;
use crate::validation::CredentialValidator;
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl AuthUser {
    fn into_identity(self, fallback_email: &str) -> Identity {
        Identity {
            id: self.id,
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// Identity provider backed by the hosted auth API.
#[derive(Debug, Clone)]
pub struct RemoteIdentityProvider {
    client: Client,
    config: RestConfig,
}

impl RemoteIdentityProvider {
    /// # Errors
    ///
    /// Returns a store error if the HTTP client cannot be built.
    pub fn new(config: RestConfig) -> Result<Self> {
        let client = build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url())
    }

    fn session_from(&self, token: TokenResponse, email: &str) -> Session {
        Session {
            identity: token.user.into_identity(email),
            access_token: Some(token.access_token),
            provider: self.name().to_string(),
        }
    }
}

impl IdentityProvider for RemoteIdentityProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn sign_up(&mut self, email: &str, password: &str) -> Result<SignUp> {
        let email = CredentialValidator::validate(email, password)?;
        let request = with_auth(
            self.client.post(self.auth_url("signup")),
            &self.config.api_key,
            None,
        )
        .json(&json!({ "email": email, "password": password }));

        let resp = match check_response(request.send().map_err(StoreError::from)?) {
            Ok(resp) => resp,
            Err(StoreError::Api { status, message })
                if status == 422 || message.to_lowercase().contains("already registered") =>
            {
                debug!(status, %message, "Sign-up rejected");
                return Err(TrackError::AccountExists { email });
            }
            Err(e) => return Err(e.into()),
        };

        // With auto-confirm the body is a full session; otherwise just the user.
        let body: Value = read_json(resp)?;
        let decode = |e: serde_json::Error| StoreError::Decode(e.to_string());
        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body).map_err(decode)?;
            return Ok(SignUp::SignedIn(self.session_from(token, &email)));
        }

        let user_value = body.get("user").cloned().unwrap_or(body);
        let user: AuthUser = serde_json::from_value(user_value).map_err(decode)?;
        Ok(SignUp::ConfirmationRequired(user.into_identity(&email)))
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        let request = with_auth(
            self.client.post(self.auth_url("token?grant_type=password")),
            &self.config.api_key,
            None,
        )
        .json(&json!({ "email": email, "password": password }));

        let resp = match check_response(request.send().map_err(StoreError::from)?) {
            Ok(resp) => resp,
            Err(StoreError::Api { status: 400, message } | StoreError::Unauthorized { message }) => {
                debug!(%message, "Sign-in rejected");
                return Err(TrackError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let token: TokenResponse = read_json(resp)?;
        Ok(self.session_from(token, &email))
    }

    fn sign_out(&mut self, session: &Session) -> Result<()> {
        let Some(token) = session.access_token.as_deref() else {
            return Ok(());
        };
        let request = with_auth(
            self.client.post(self.auth_url("logout")),
            &self.config.api_key,
            Some(token),
        );

        match check_response(request.send().map_err(StoreError::from)?) {
            // An expired token is as signed-out as it gets.
            Ok(_) | Err(StoreError::Unauthorized { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
