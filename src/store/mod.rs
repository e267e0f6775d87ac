//! Remote document store contract.
//!
//! DESIGN
//! ======
//! Documents are JSON objects addressed by `(collection, id)`. The contract
//! mirrors the hosted store: `get` returns `None` for a missing document,
//! `set` creates or overwrites the whole document and `update` merges the
//! named fields into an existing one, leaving other fields untouched.
//!
//! There is no version token on writes. Read-modify-write callers race each
//! other and the last write wins.

pub mod firestore;
pub mod memory;

use crate::config::USERS_COLLECTION;
use crate::error::ErrorCode;
use crate::identity::Identity;

/// Field-structured record stored remotely.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub collection: String,
    pub id: String,
}

impl DocumentKey {
    #[must_use]
    pub fn new(collection: &str, id: &str) -> Self {
        Self { collection: collection.to_owned(), id: id.to_owned() }
    }

    /// Key of the profile document owned by `uid`.
    #[must_use]
    pub fn user(uid: &str) -> Self {
        Self::new(USERS_COLLECTION, uid)
    }

    /// Slash-joined document path, e.g. `users/abc123`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("store request failed: {0}")]
    Request(String),

    /// The store answered with a non-success status.
    #[error("store response error: status {status}")]
    Response { status: u16, body: String },

    /// `update` targeted a document that does not exist.
    #[error("document not found: {path}")]
    NotFound { path: String },

    #[error("store response parse failed: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_STORE_REQUEST",
            Self::Response { .. } => "E_STORE_RESPONSE",
            Self::NotFound { .. } => "E_STORE_NOT_FOUND",
            Self::Parse(_) => "E_STORE_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Keyed document database. Every call is made on behalf of `caller`.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document; `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on network, permission or decode failure.
    async fn get(&self, caller: &Identity, key: &DocumentKey) -> Result<Option<Document>, StoreError>;

    /// Create or fully overwrite a document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on network or permission failure.
    async fn set(&self, caller: &Identity, key: &DocumentKey, document: Document) -> Result<(), StoreError>;

    /// Merge `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist, or
    /// another [`StoreError`] on network or permission failure.
    async fn update(&self, caller: &Identity, key: &DocumentKey, fields: Document) -> Result<(), StoreError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
