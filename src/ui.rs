//! Page surface abstraction.
//!
//! DESIGN
//! ======
//! Controllers never touch a concrete page. They read and write form
//! fields, render the gallery and show alerts through [`Surface`], addressed
//! by the element ids in [`ids`]. A missing element is reported as
//! [`ElementNotFound`]; callers log it and skip that step.
//!
//! [`MemorySurface`] records everything in memory for tests and headless
//! runs. The binary supplies a terminal surface.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::payload::ImagePayload;

/// Element identifiers the controllers address.
pub mod ids {
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const GOAL: &str = "goal";
    pub const PHOTO_GALLERY: &str = "photo-gallery";
    pub const PROGRESS_PHOTOS: &str = "progress-photos";
    pub const SAVE_PHOTOS: &str = "save-photos";
    pub const PHOTO_MODAL: &str = "photo-modal";

    pub const LOGIN_EMAIL: &str = "login-email";
    pub const LOGIN_PASSWORD: &str = "password";
    pub const SIGNUP_NAME: &str = "signup-name";
    pub const SIGNUP_EMAIL: &str = "signup-email";
    pub const SIGNUP_PASSWORD: &str = "signup-password";
}

pub const NO_PHOTOS_MESSAGE: &str = "No progress photos available.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("element not found: #{id}")]
pub struct ElementNotFound {
    pub id: String,
}

impl ElementNotFound {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self { id: id.to_owned() }
    }
}

// =============================================================================
// GALLERY VIEW
// =============================================================================

/// One rendered photo. `index` is the position in the persisted array, which
/// can differ from the tile position when invalid entries were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryTile {
    pub index: usize,
    pub alt: String,
    pub payload: ImagePayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryView {
    Placeholder(String),
    Tiles(Vec<GalleryTile>),
}

impl GalleryView {
    #[must_use]
    pub fn tiles(&self) -> &[GalleryTile] {
        match self {
            Self::Tiles(tiles) => tiles,
            Self::Placeholder(_) => &[],
        }
    }
}

// =============================================================================
// SURFACE TRAIT
// =============================================================================

pub trait Surface: Send + Sync {
    /// Current value of a form field.
    ///
    /// # Errors
    ///
    /// Returns [`ElementNotFound`] if the page has no such field.
    fn field_value(&self, id: &str) -> Result<String, ElementNotFound>;

    /// Replace the value of a form field.
    ///
    /// # Errors
    ///
    /// Returns [`ElementNotFound`] if the page has no such field.
    fn set_field_value(&self, id: &str, value: &str) -> Result<(), ElementNotFound>;

    /// Replace the gallery contents.
    ///
    /// # Errors
    ///
    /// Returns [`ElementNotFound`] if the page has no gallery container.
    fn render_gallery(&self, view: &GalleryView) -> Result<(), ElementNotFound>;

    /// Show the enlarged-photo modal with `image`, or hide it on `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ElementNotFound`] if the page has no modal.
    fn show_modal(&self, image: Option<&ImagePayload>) -> Result<(), ElementNotFound>;

    fn alert(&self, message: &str);

    fn navigate(&self, page: &str);
}

// =============================================================================
// MEMORY SURFACE
// =============================================================================

#[derive(Debug, Default)]
struct Recorded {
    elements: HashSet<String>,
    fields: HashMap<String, String>,
    gallery: Option<GalleryView>,
    modal: Option<ImagePayload>,
    alerts: Vec<String>,
    location: Option<String>,
}

/// Surface that keeps page state in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    inner: Mutex<Recorded>,
}

impl MemorySurface {
    /// A page containing exactly the given element ids.
    #[must_use]
    pub fn with_elements(elements: &[&str]) -> Self {
        let recorded = Recorded {
            elements: elements.iter().map(|id| (*id).to_owned()).collect(),
            ..Recorded::default()
        };
        Self { inner: Mutex::new(recorded) }
    }

    /// The login/signup page.
    #[must_use]
    pub fn auth_page() -> Self {
        Self::with_elements(&[
            ids::LOGIN_EMAIL,
            ids::LOGIN_PASSWORD,
            ids::SIGNUP_NAME,
            ids::SIGNUP_EMAIL,
            ids::SIGNUP_PASSWORD,
        ])
    }

    /// The profile page with the gallery and its modal.
    #[must_use]
    pub fn profile_page() -> Self {
        Self::with_elements(&[
            ids::USERNAME,
            ids::EMAIL,
            ids::GOAL,
            ids::PHOTO_GALLERY,
            ids::PROGRESS_PHOTOS,
            ids::SAVE_PHOTOS,
            ids::PHOTO_MODAL,
        ])
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require(recorded: &Recorded, id: &str) -> Result<(), ElementNotFound> {
        if recorded.elements.contains(id) {
            Ok(())
        } else {
            Err(ElementNotFound::new(id))
        }
    }

    #[must_use]
    pub fn gallery(&self) -> Option<GalleryView> {
        self.lock().gallery.clone()
    }

    #[must_use]
    pub fn modal_image(&self) -> Option<ImagePayload> {
        self.lock().modal.clone()
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.lock().location.clone()
    }

    /// Field value, or `None` when the field is absent or never set.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<String> {
        self.lock().fields.get(id).cloned()
    }
}

impl Surface for MemorySurface {
    fn field_value(&self, id: &str) -> Result<String, ElementNotFound> {
        let recorded = self.lock();
        Self::require(&recorded, id)?;
        Ok(recorded.fields.get(id).cloned().unwrap_or_default())
    }

    fn set_field_value(&self, id: &str, value: &str) -> Result<(), ElementNotFound> {
        let mut recorded = self.lock();
        Self::require(&recorded, id)?;
        recorded.fields.insert(id.to_owned(), value.to_owned());
        Ok(())
    }

    fn render_gallery(&self, view: &GalleryView) -> Result<(), ElementNotFound> {
        let mut recorded = self.lock();
        Self::require(&recorded, ids::PHOTO_GALLERY)?;
        recorded.gallery = Some(view.clone());
        Ok(())
    }

    fn show_modal(&self, image: Option<&ImagePayload>) -> Result<(), ElementNotFound> {
        let mut recorded = self.lock();
        Self::require(&recorded, ids::PHOTO_MODAL)?;
        recorded.modal = image.cloned();
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_owned());
    }

    fn navigate(&self, page: &str) {
        self.lock().location = Some(page.to_owned());
    }
}

#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;
