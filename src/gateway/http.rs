//! Shared HTTP helpers for the hosted table and auth APIs.
//!
//! Centralizes client construction, the `apikey`/bearer header pair and
//! status-code checks (401/403 → [`StoreError::Unauthorized`], any other
//! non-success → [`StoreError::Api`]) so the REST gateway and the remote
//! identity provider stay focused on request shapes.

use crate::error::{StoreError, StoreResult};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout for hosted API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a blocking client with the given timeout.
///
/// # Errors
///
/// Returns `StoreError::Http` if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> StoreResult<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("issuetrack/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Attach the `apikey` header and a bearer token.
///
/// The bearer is the session's access token when there is one, else the
/// API key itself (anonymous role).
#[must_use]
pub fn with_auth(builder: RequestBuilder, api_key: &str, access_token: Option<&str>) -> RequestBuilder {
    let bearer = access_token.unwrap_or(api_key);
    builder
        .header("apikey", api_key)
        .header("Authorization", format!("Bearer {bearer}"))
}

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success.
///
/// # Errors
///
/// - **401/403** → [`StoreError::Unauthorized`]
/// - **Other non-success** → [`StoreError::Api`] with the status and the
///   server's message
pub fn check_response(resp: Response) -> StoreResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = error_message(&resp.text().unwrap_or_default());
    warn!(status = status.as_u16(), %message, "Store request failed");

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StoreError::Unauthorized { message });
    }
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Read a successful response body as JSON.
///
/// # Errors
///
/// Returns `StoreError::Http` if the body cannot be read, or
/// `StoreError::Decode` if it is not the expected shape.
pub fn read_json<T: DeserializeOwned>(resp: Response) -> StoreResult<T> {
    let body = resp.text()?;
    debug!(bytes = body.len(), "Read store response");
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Pull a human message out of an error body.
///
/// PostgREST uses `message`, GoTrue uses `msg` or `error_description`.
/// Falls back to the raw body.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .map_or_else(|| body.trim().to_string(), ToString::to_string)
}

/// Percent-encode a value for a PostgREST filter.
#[must_use]
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_from_postgrest_body() {
        let body = r#"{"code":"42501","message":"permission denied for table issues"}"#;
        assert_eq!(error_message(body), "permission denied for table issues");
    }

    #[test]
    fn error_message_from_gotrue_body() {
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message(r#"{"msg":"User already registered"}"#), "User already registered");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("  Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(r#"{"hint":null}"#), r#"{"hint":null}"#);
    }

    #[test]
    fn encode_escapes_filter_values() {
        assert_eq!(encode("a b&c"), "a%20b%26c");
        assert_eq!(encode("it-abc"), "it-abc");
    }
}
