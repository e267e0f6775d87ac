//! Identity provider contract and the current-session holder.
//!
//! DESIGN
//! ======
//! The hosted identity service is an external collaborator. Controllers see
//! it only through [`IdentityProvider`], so the REST client and the
//! in-process provider are interchangeable. [`Session`] replaces the SDK's
//! implicit "current user": it is set on successful login or signup and read
//! by every profile and photo operation.

pub mod firebase;
pub mod memory;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ErrorCode;

// =============================================================================
// IDENTITY
// =============================================================================

/// An authenticated user as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable unique id; keys the user's profile document.
    pub uid: String,
    pub email: String,
    /// Bearer token for store requests made on behalf of this user.
    pub id_token: String,
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by identity provider calls.
///
/// Provider-defined rejection codes (`EMAIL_EXISTS`, `INVALID_PASSWORD`, ...)
/// are kept for logging; callers do not branch on them.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("identity request failed: {0}")]
    Request(String),

    /// The provider refused the credentials or the operation.
    #[error("identity provider rejected request: {code}")]
    Rejected { status: u16, code: String },

    /// The provider response body could not be deserialized.
    #[error("identity response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_AUTH_REQUEST",
            Self::Rejected { .. } => "E_AUTH_REJECTED",
            Self::Parse(_) => "E_AUTH_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Rejected { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// PROVIDER TRAIT
// =============================================================================

/// Email + password identity provider. Enables mocking in tests.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and return its identity.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the provider refuses or cannot be reached.
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Check credentials of an existing account and return its identity.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the credentials are rejected or the provider
    /// cannot be reached.
    async fn verify_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
}

// =============================================================================
// SESSION
// =============================================================================

/// Shared holder for the currently authenticated identity.
/// Clone is cheap; all clones observe the same identity.
#[derive(Clone, Debug, Default)]
pub struct Session {
    current: Arc<RwLock<Option<Identity>>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that starts out signed in as `identity`.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self { current: Arc::new(RwLock::new(Some(identity))) }
    }

    pub async fn current(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }

    pub async fn set(&self, identity: Identity) {
        *self.current.write().await = Some(identity);
    }

    pub async fn sign_out(&self) {
        *self.current.write().await = None;
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
