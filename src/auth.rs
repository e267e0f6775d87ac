//! Auth flow controller: login, signup and the login/signup form mode.
//!
//! Failures reach the user as one generic alert per action; the underlying
//! provider or store error is only logged. Nothing is retried.
//!
//! Signup is two remote steps with no rollback: if the profile document write
//! fails after the identity was created, the account exists without a
//! profile document.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::{HOME_PAGE, MIN_PASSWORD_LEN};
use crate::error::AppError;
use crate::identity::{Identity, IdentityProvider};
use crate::profile::ProfileStore;
use crate::ui::{Surface, ids};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";
pub const SIGNUP_FAILED_MESSAGE: &str = "Signup failed. Please try again.";
pub const SIGNUP_SUCCESS_MESSAGE: &str = "Account created successfully!";
pub const SHORT_PASSWORD_MESSAGE: &str = "Password should be at least 6 characters long.";

/// Which of the two credential forms is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Login,
    Signup,
}

pub struct AuthFlow {
    provider: Arc<dyn IdentityProvider>,
    profiles: ProfileStore,
    surface: Arc<dyn Surface>,
    mode: FormMode,
}

impl AuthFlow {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, profiles: ProfileStore, surface: Arc<dyn Surface>) -> Self {
        Self { provider, profiles, surface, mode: FormMode::Login }
    }

    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn show_login(&mut self) {
        self.mode = FormMode::Login;
    }

    pub fn show_signup(&mut self) {
        self.mode = FormMode::Signup;
    }

    /// Verify credentials, start the session and navigate to the home page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Auth`] if the provider rejects the credentials or
    /// cannot be reached; the user sees a generic alert.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity, AppError> {
        match self.provider.verify_identity(email, password).await {
            Ok(identity) => {
                info!(uid = %identity.uid, "login succeeded");
                self.profiles.session().set(identity.clone()).await;
                self.surface.navigate(HOME_PAGE);
                Ok(identity)
            }
            Err(e) => {
                error!(error = %e, "login failed");
                self.surface.alert(LOGIN_FAILED_MESSAGE);
                Err(e.into())
            }
        }
    }

    /// Create an account and its initial profile document.
    ///
    /// The password length is checked locally first; a short password never
    /// reaches the provider.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a short password
    /// - [`AppError::Auth`] if the provider refuses the account
    /// - [`AppError::Store`] if the profile document write fails (the
    ///   identity is kept)
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<Identity, AppError> {
        if password.encode_utf16().count() < MIN_PASSWORD_LEN {
            self.surface.alert(SHORT_PASSWORD_MESSAGE);
            return Err(AppError::Validation(format!(
                "password shorter than {MIN_PASSWORD_LEN} characters"
            )));
        }

        let identity = match self.provider.create_identity(email, password).await {
            Ok(identity) => identity,
            Err(e) => {
                error!(error = %e, "signup failed");
                self.surface.alert(SIGNUP_FAILED_MESSAGE);
                return Err(e.into());
            }
        };
        self.profiles.session().set(identity.clone()).await;

        if let Err(e) = self.profiles.create_profile(&identity, name, email).await {
            error!(error = %e, uid = %identity.uid, "identity created but profile document write failed");
            self.surface.alert(SIGNUP_FAILED_MESSAGE);
            return Err(e.into());
        }

        info!(uid = %identity.uid, "account created");
        for id in [ids::SIGNUP_NAME, ids::SIGNUP_EMAIL, ids::SIGNUP_PASSWORD] {
            if let Err(e) = self.surface.set_field_value(id, "") {
                warn!(error = %e, "signup field missing; not cleared");
            }
        }
        self.surface.alert(SIGNUP_SUCCESS_MESSAGE);
        self.show_login();
        Ok(identity)
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
