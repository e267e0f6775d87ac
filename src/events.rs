//! UI event adapter.
//!
//! ARCHITECTURE
//! ============
//! Page events arrive as [`UiEvent`] values and are routed to the owning
//! controller. This layer reads form fields from the surface and translates
//! page-level gestures (tile clicks, key presses) into controller calls.
//! Controllers never see the event type.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::AuthFlow;
use crate::error::AppError;
use crate::gallery::{GalleryManager, ModalClick};
use crate::identity::{IdentityProvider, Session};
use crate::payload::SelectedFile;
use crate::profile::{ProfileStore, SAVE_PROFILE_FAILED_MESSAGE, UserProfile};
use crate::store::DocumentStore;
use crate::ui::{Surface, ids};

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Profile page finished loading.
    PageLoaded,
    ShowLogin,
    ShowSignup,
    LoginSubmitted,
    SignupSubmitted,
    SaveProfileClicked,
    /// "Save photos" pressed with the current file selection.
    SavePhotosClicked(Vec<SelectedFile>),
    /// Delete button on the tile for the stored position.
    DeletePhotoClicked(usize),
    /// Tile image clicked.
    PhotoClicked(usize),
    ModalClicked(ModalClick),
    KeyDown(String),
}

pub struct App {
    surface: Arc<dyn Surface>,
    profiles: ProfileStore,
    auth: AuthFlow,
    gallery: GalleryManager,
}

impl App {
    /// Wire the controllers around a fresh, signed-out session.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>, surface: Arc<dyn Surface>) -> Self {
        Self::with_session(provider, store, surface, Session::new())
    }

    #[must_use]
    pub fn with_session(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        surface: Arc<dyn Surface>,
        session: Session,
    ) -> Self {
        let profiles = ProfileStore::new(store, session);
        let auth = AuthFlow::new(provider, profiles.clone(), surface.clone());
        let gallery = GalleryManager::new(profiles.clone(), surface.clone());
        Self { surface, profiles, auth, gallery }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.profiles.session()
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    #[must_use]
    pub fn auth(&self) -> &AuthFlow {
        &self.auth
    }

    #[must_use]
    pub fn gallery(&self) -> &GalleryManager {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut GalleryManager {
        &mut self.gallery
    }

    /// Route one event to its controller.
    ///
    /// # Errors
    ///
    /// Returns the controller's error; it has already been logged and, where
    /// the action is user-facing, alerted.
    pub async fn dispatch(&mut self, event: UiEvent) -> Result<(), AppError> {
        debug!(?event, "dispatch");
        match event {
            UiEvent::PageLoaded => self.handle_page_loaded().await,
            UiEvent::ShowLogin => {
                self.auth.show_login();
                Ok(())
            }
            UiEvent::ShowSignup => {
                self.auth.show_signup();
                Ok(())
            }
            UiEvent::LoginSubmitted => self.handle_login().await,
            UiEvent::SignupSubmitted => self.handle_signup().await,
            UiEvent::SaveProfileClicked => self.handle_save_profile().await,
            UiEvent::SavePhotosClicked(files) => self.gallery.add_batch(&files).await.map(|_| ()),
            UiEvent::DeletePhotoClicked(index) => self.gallery.delete_shown(index).await,
            UiEvent::PhotoClicked(index) => {
                if !self.gallery.open_photo(index) {
                    warn!(index, "no photo to enlarge");
                }
                Ok(())
            }
            UiEvent::ModalClicked(target) => {
                self.gallery.handle_modal_click(target);
                Ok(())
            }
            UiEvent::KeyDown(key) => {
                self.gallery.handle_key(&key);
                Ok(())
            }
        }
    }

    async fn handle_page_loaded(&mut self) -> Result<(), AppError> {
        if let Err(e) = self.profiles.load_profile(self.surface.as_ref()).await {
            tracing::error!(error = %e, "error loading profile");
            return Err(e);
        }
        self.gallery.load().await
    }

    async fn handle_login(&mut self) -> Result<(), AppError> {
        let email = self.read_field(ids::LOGIN_EMAIL)?;
        let password = self.read_field(ids::LOGIN_PASSWORD)?;
        self.auth.login(&email, &password).await.map(|_| ())
    }

    async fn handle_signup(&mut self) -> Result<(), AppError> {
        let name = self.read_field(ids::SIGNUP_NAME)?;
        let email = self.read_field(ids::SIGNUP_EMAIL)?;
        let password = self.read_field(ids::SIGNUP_PASSWORD)?;
        self.auth.signup(&name, &email, &password).await.map(|_| ())
    }

    async fn handle_save_profile(&mut self) -> Result<(), AppError> {
        let goal = self.read_field(ids::GOAL)?;
        let profile = UserProfile { goal, ..UserProfile::default() };
        self.profiles
            .save_profile(&profile)
            .await
            .inspect_err(|_| self.surface.alert(SAVE_PROFILE_FAILED_MESSAGE))
    }

    fn read_field(&self, id: &str) -> Result<String, AppError> {
        self.surface.field_value(id).map_err(|e| {
            warn!(error = %e, "form field missing; action skipped");
            AppError::from(e)
        })
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
