//! Profile store adapter.
//!
//! DESIGN
//! ======
//! Translates profile reads and writes into document store calls keyed by
//! the current session identity. Owns no state beyond its handles.
//!
//! Reads soft-fail: no identity or no document yields an empty profile.
//! Writes require an identity and fail with `NotAuthenticated` before any
//! remote call. Writes are partial updates of a single field, so `goal` and
//! `progressPhotos` writers never overwrite each other's field, though photo
//! writers still race each other on the array (read-modify-write).

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::AppError;
use crate::identity::{Identity, Session};
use crate::payload::ImagePayload;
use crate::store::{Document, DocumentKey, DocumentStore, StoreError};
use crate::ui::{Surface, ids};

pub const SAVE_PROFILE_FAILED_MESSAGE: &str = "Failed to save profile. Please try again.";

const FIELD_NAME: &str = "name";
const FIELD_EMAIL: &str = "email";
const FIELD_GOAL: &str = "goal";
const FIELD_PHOTOS: &str = "progressPhotos";

// =============================================================================
// USER PROFILE
// =============================================================================

/// One profile document per identity. Absent fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub goal: String,
    pub progress_photos: Vec<ImagePayload>,
}

impl UserProfile {
    /// Decode a stored document. Unknown fields are ignored; a photo entry
    /// that is not a string is kept as an empty (invalid) payload so array
    /// positions stay aligned with the stored array.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let text = |field: &str| {
            document
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            name: text(FIELD_NAME),
            email: text(FIELD_EMAIL),
            goal: text(FIELD_GOAL),
            progress_photos: photos_from_document(document).unwrap_or_default(),
        }
    }
}

fn photos_from_document(document: &Document) -> Option<Vec<ImagePayload>> {
    let items = document.get(FIELD_PHOTOS)?.as_array()?;
    Some(
        items
            .iter()
            .map(|v| ImagePayload::new(v.as_str().unwrap_or_default()))
            .collect(),
    )
}

fn photos_value(photos: &[ImagePayload]) -> Value {
    Value::Array(
        photos
            .iter()
            .map(|p| Value::String(p.as_str().to_owned()))
            .collect(),
    )
}

fn single_field(field: &str, value: Value) -> Document {
    let mut document = Document::new();
    document.insert(field.to_owned(), value);
    document
}

// =============================================================================
// ADAPTER
// =============================================================================

#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn DocumentStore>,
    session: Session,
}

impl ProfileStore {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, session: Session) -> Self {
        Self { store, session }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn require_identity(&self) -> Result<Identity, AppError> {
        self.session.current().await.ok_or(AppError::NotAuthenticated)
    }

    /// Read the current user's profile.
    ///
    /// Returns an empty profile when nobody is signed in or the document does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the read itself fails.
    pub async fn get_profile(&self) -> Result<UserProfile, StoreError> {
        let Some(identity) = self.session.current().await else {
            warn!("no authenticated user found");
            return Ok(UserProfile::default());
        };

        let document = self
            .store
            .get(&identity, &DocumentKey::user(&identity.uid))
            .await
            .inspect_err(|e| tracing::error!(error = %e, uid = %identity.uid, "failed to fetch user profile"))?;
        Ok(document
            .as_ref()
            .map(UserProfile::from_document)
            .unwrap_or_default())
    }

    /// Persist the profile's `goal`. Other stored fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotAuthenticated`] without writing when nobody is
    /// signed in, or [`AppError::Store`] if the update fails.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let identity = self.require_identity().await?;
        self.store
            .update(&identity, &DocumentKey::user(&identity.uid), single_field(FIELD_GOAL, json!(profile.goal)))
            .await
            .inspect_err(|e| tracing::error!(error = %e, uid = %identity.uid, "failed to save profile"))?;
        info!(uid = %identity.uid, "profile updated");
        Ok(())
    }

    /// Copy `name`, `email` and `goal` into the profile form. Missing form
    /// fields are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the profile cannot be read.
    pub async fn load_profile(&self, surface: &dyn Surface) -> Result<(), AppError> {
        let profile = self.get_profile().await?;

        for (id, value) in [(ids::USERNAME, &profile.name), (ids::EMAIL, &profile.email), (ids::GOAL, &profile.goal)] {
            if let Err(e) = surface.set_field_value(id, value) {
                warn!(error = %e, "form field missing; skipped");
            }
        }
        Ok(())
    }

    /// Write the initial profile document for a freshly created identity.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub async fn create_profile(&self, identity: &Identity, name: &str, email: &str) -> Result<(), StoreError> {
        let mut document = Document::new();
        document.insert(FIELD_NAME.into(), json!(name));
        document.insert(FIELD_EMAIL.into(), json!(email));
        self.store
            .set(identity, &DocumentKey::user(&identity.uid), document)
            .await
    }

    /// Fetch the stored photo array.
    ///
    /// `Ok(None)` means the profile document does not exist; a document
    /// without the field yields an empty array.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotAuthenticated`] when nobody is signed in, or
    /// [`AppError::Store`] if the read fails.
    pub async fn fetch_photos(&self) -> Result<Option<Vec<ImagePayload>>, AppError> {
        let identity = self.require_identity().await?;
        let document = self
            .store
            .get(&identity, &DocumentKey::user(&identity.uid))
            .await?;
        Ok(document.map(|doc| photos_from_document(&doc).unwrap_or_default()))
    }

    /// Overwrite the stored photo array with `photos`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotAuthenticated`] without writing when nobody is
    /// signed in, or [`AppError::Store`] if the update fails.
    pub async fn save_progress_photos(&self, photos: &[ImagePayload]) -> Result<(), AppError> {
        let identity = self.require_identity().await?;
        self.store
            .update(&identity, &DocumentKey::user(&identity.uid), single_field(FIELD_PHOTOS, photos_value(photos)))
            .await?;
        info!(uid = %identity.uid, count = photos.len(), "progress photos saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
