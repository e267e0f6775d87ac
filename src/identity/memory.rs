//! In-process identity provider for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AuthError, Identity, IdentityProvider};

struct Account {
    uid: String,
    password: String,
}

/// Accounts keyed by normalized email. Counts every call so tests can assert
/// that local validation short-circuits before the provider is reached.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    calls: AtomicUsize,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of create/verify calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn rejected(code: &str) -> AuthError {
    AuthError::Rejected { status: 400, code: code.to_owned() }
}

fn issue(uid: &str, email: &str) -> Identity {
    Identity { uid: uid.to_owned(), email: email.to_owned(), id_token: Uuid::new_v4().simple().to_string() }
}

#[async_trait::async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let email = normalize(email);
        if !email.contains('@') {
            return Err(rejected("INVALID_EMAIL"));
        }

        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&email) {
            return Err(rejected("EMAIL_EXISTS"));
        }

        let uid = Uuid::new_v4().simple().to_string();
        accounts.insert(email.clone(), Account { uid: uid.clone(), password: password.to_owned() });
        Ok(issue(&uid, &email))
    }

    async fn verify_identity(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let email = normalize(email);

        let accounts = self.accounts.lock().await;
        match accounts.get(&email) {
            Some(account) if account.password == password => Ok(issue(&account.uid, &email)),
            _ => Err(rejected("INVALID_LOGIN_CREDENTIALS")),
        }
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
