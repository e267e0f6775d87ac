//! Error taxonomy shared by the controllers.
//!
//! DESIGN
//! ======
//! Each area owns its own `thiserror` enum. `AppError` folds them into the
//! five user-action failure classes: local validation, provider auth,
//! provider store, missing identity and missing UI element. Nothing is
//! retried automatically; `retryable` only informs logs and callers.

use crate::identity::AuthError;
use crate::payload::PayloadError;
use crate::store::StoreError;
use crate::ui::ElementNotFound;

/// Stable machine-readable code for an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Local input check failed before any remote call.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The operation needs a signed-in identity and none is present.
    #[error("no authenticated user")]
    NotAuthenticated,

    #[error(transparent)]
    ElementNotFound(#[from] ElementNotFound),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl ErrorCode for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Auth(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::NotAuthenticated => "E_NOT_AUTHENTICATED",
            Self::ElementNotFound(_) => "E_ELEMENT_NOT_FOUND",
            Self::Payload(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Auth(e) => e.retryable(),
            Self::Store(e) => e.retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
