//! Identity Toolkit REST client.
//!
//! Thin HTTP wrapper for `accounts:signUp` and `accounts:signInWithPassword`.
//! Pure parsing in `parse_response` / `parse_error` for testability.

use std::time::Duration;

use super::{AuthError, Identity, IdentityProvider};
use crate::config::FirebaseConfig;

const SIGN_UP: &str = "signUp";
const SIGN_IN: &str = "signInWithPassword";

// =============================================================================
// CLIENT
// =============================================================================

pub struct FirebaseAuthClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FirebaseAuthClient {
    /// Build a client from the shared Firebase config.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key.clone(), base_url: config.auth_base_url.clone() })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{method}?key={}", self.base_url, self.api_key)
    }

    async fn call(&self, method: &str, email: &str, password: &str) -> Result<Identity, AuthError> {
        let body = CredentialRequest { email, password, return_secure_token: true };

        let response = self
            .http
            .post(self.endpoint(method))
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(request_error)?;

        if !(200..300).contains(&status) {
            return Err(parse_error(status, &text));
        }

        parse_response(&text)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.call(SIGN_UP, email, password).await
    }

    async fn verify_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.call(SIGN_IN, email, password).await
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

/// Transport failure. The URL is dropped because its query carries the API key.
fn request_error(e: reqwest::Error) -> AuthError {
    AuthError::Request(e.without_url().to_string())
}

fn parse_response(json: &str) -> Result<Identity, AuthError> {
    let api: CredentialResponse = serde_json::from_str(json).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(Identity { uid: api.local_id, email: api.email, id_token: api.id_token })
}

/// Map an error response to [`AuthError::Rejected`].
///
/// Messages look like `INVALID_PASSWORD` or `WEAK_PASSWORD : Password should
/// be at least 6 characters`; only the leading code is kept.
fn parse_error(status: u16, body: &str) -> AuthError {
    let code = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| {
            env.error
                .message
                .split(':')
                .next()
                .unwrap_or_default()
                .trim()
                .to_owned()
        })
        .unwrap_or_else(|_| format!("HTTP_{status}"));
    AuthError::Rejected { status, code }
}

#[cfg(test)]
#[path = "firebase_test.rs"]
mod tests;
