//! Firebase configuration parsed from environment variables.

pub const DEFAULT_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Minimum password length accepted by signup before any remote call,
/// counted in UTF-16 code units like the identity provider's web SDK.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Collection holding one profile document per identity.
pub const USERS_COLLECTION: &str = "users";
/// Page the login flow navigates to on success.
pub const HOME_PAGE: &str = "main.html";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing config: env var {var} not set")]
    Missing { var: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    pub auth_base_url: String,
    pub firestore_base_url: String,
    pub timeouts: HttpTimeouts,
}

impl FirebaseConfig {
    /// Build typed Firebase config from environment variables.
    ///
    /// Required:
    /// - `FIREBASE_API_KEY`
    /// - `FIREBASE_PROJECT_ID`
    ///
    /// Optional:
    /// - `FIREBASE_AUTH_BASE_URL`: Identity Toolkit base URL
    /// - `FIREBASE_FIRESTORE_BASE_URL`: Firestore REST base URL
    /// - `FIREBASE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `FIREBASE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when a required variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`FirebaseConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when a required key is absent or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::Missing { var: var.to_owned() })
        };

        let api_key = required("FIREBASE_API_KEY")?;
        let project_id = required("FIREBASE_PROJECT_ID")?;
        let auth_base_url = base_url(lookup("FIREBASE_AUTH_BASE_URL"), DEFAULT_AUTH_BASE_URL);
        let firestore_base_url = base_url(lookup("FIREBASE_FIRESTORE_BASE_URL"), DEFAULT_FIRESTORE_BASE_URL);
        let timeouts = HttpTimeouts {
            request_secs: parse_u64(lookup("FIREBASE_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("FIREBASE_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, project_id, auth_base_url, firestore_base_url, timeouts })
    }
}

fn base_url(raw: Option<String>, default: &str) -> String {
    raw.unwrap_or_else(|| default.to_owned())
        .trim_end_matches('/')
        .to_owned()
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
