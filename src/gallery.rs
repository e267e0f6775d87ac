//! Progress-photo gallery manager.
//!
//! DESIGN
//! ======
//! Holds the photos shown on the page and keeps them equal to the stored
//! `progressPhotos` array after every successful mutation. Every mutation
//! rewrites the whole array; there are no indexed remote updates.
//!
//! States: `Empty` (nothing loaded or nothing stored) and `Populated`.
//!
//! - load: fetch the array, render it or the placeholder.
//! - add-batch: encode every selected file (all-or-nothing), re-read the
//!   stored array, append, persist, render, clear the file input.
//! - delete-one: remove a position from a caller-supplied snapshot,
//!   persist the rest, render.
//!
//! CONCURRENCY
//! ===========
//! The re-read in add-batch is not atomic with the following write, and
//! delete-one trusts its snapshot. Two managers working on the same document
//! (two tabs) can both start from the same array; whichever writes last
//! wins and the other change is lost. No version token guards the write.
//!
//! The modal is page state only and never touches the store.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::payload::{self, ImagePayload, SelectedFile};
use crate::profile::ProfileStore;
use crate::ui::{GalleryTile, GalleryView, NO_PHOTOS_MESSAGE, Surface, ids};

pub const SELECT_PHOTOS_MESSAGE: &str = "Please select at least one photo";
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to save photos. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete photo. Please try again.";

pub const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GalleryState {
    #[default]
    Empty,
    Populated(Vec<ImagePayload>),
}

impl GalleryState {
    fn from_photos(photos: Vec<ImagePayload>) -> Self {
        if photos.is_empty() { Self::Empty } else { Self::Populated(photos) }
    }
}

/// Where a click on the open modal landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    /// The dimmed area around the image.
    Backdrop,
    /// The image or anything inside the content box.
    Content,
    CloseButton,
}

pub struct GalleryManager {
    profiles: ProfileStore,
    surface: Arc<dyn Surface>,
    state: GalleryState,
    modal: Option<ImagePayload>,
}

impl GalleryManager {
    #[must_use]
    pub fn new(profiles: ProfileStore, surface: Arc<dyn Surface>) -> Self {
        Self { profiles, surface, state: GalleryState::Empty, modal: None }
    }

    #[must_use]
    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Photos currently held in memory, in stored order.
    #[must_use]
    pub fn photos(&self) -> &[ImagePayload] {
        match &self.state {
            GalleryState::Empty => &[],
            GalleryState::Populated(photos) => photos,
        }
    }

    #[must_use]
    pub fn modal_image(&self) -> Option<&ImagePayload> {
        self.modal.as_ref()
    }

    // =========================================================================
    // LOAD
    // =========================================================================

    /// Fetch the stored photos and render them.
    ///
    /// Without a signed-in user this is a logged no-op. A missing profile
    /// document leaves the gallery untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the read fails; the error is logged.
    pub async fn load(&mut self) -> Result<(), AppError> {
        let photos = match self.profiles.fetch_photos().await {
            Ok(Some(photos)) => photos,
            Ok(None) => {
                info!("user document does not exist");
                self.state = GalleryState::Empty;
                return Ok(());
            }
            Err(AppError::NotAuthenticated) => {
                warn!("no authenticated user to load progress photos");
                return Ok(());
            }
            Err(e) => {
                error!(error = %e, "failed to load progress photos");
                return Err(e);
            }
        };

        info!(count = photos.len(), "loaded progress photos");
        self.state = GalleryState::from_photos(photos);
        self.render();
        Ok(())
    }

    // =========================================================================
    // RENDER
    // =========================================================================

    /// Render the in-memory photos. Returns the number of tiles shown.
    pub fn render(&self) -> usize {
        let view = build_view(self.photos());
        let shown = view.tiles().len();
        if let Err(e) = self.surface.render_gallery(&view) {
            error!(error = %e, "photo gallery element not found");
            return 0;
        }
        debug!(shown, total = self.photos().len(), "displayed photos");
        shown
    }

    // =========================================================================
    // ADD BATCH
    // =========================================================================

    /// Encode `files`, append them to the stored array and render the result.
    ///
    /// Nothing is written unless every file encodes. Returns the number of
    /// photos added.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] when `files` is empty
    /// - [`AppError::NotAuthenticated`] when nobody is signed in
    /// - [`AppError::Payload`] when any file fails to encode
    /// - [`AppError::Store`] when the re-read or the write fails
    pub async fn add_batch(&mut self, files: &[SelectedFile]) -> Result<usize, AppError> {
        if files.is_empty() {
            self.surface.alert(SELECT_PHOTOS_MESSAGE);
            return Err(AppError::Validation("no photos selected".into()));
        }
        if self.profiles.session().current().await.is_none() {
            warn!("no authenticated user to save progress photos");
            return Err(AppError::NotAuthenticated);
        }

        let added = match payload::encode_all(files).await {
            Ok(added) => added,
            Err(e) => return Err(self.fail(e.into(), UPLOAD_FAILED_MESSAGE, "failed to encode photos")),
        };

        let updated = match self.append_remote(&added).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.fail(e, UPLOAD_FAILED_MESSAGE, "failed to save progress photos")),
        };

        self.state = GalleryState::from_photos(updated);
        self.render();
        if let Err(e) = self.surface.set_field_value(ids::PROGRESS_PHOTOS, "") {
            warn!(error = %e, "file input missing; not reset");
        }
        Ok(added.len())
    }

    async fn append_remote(&self, added: &[ImagePayload]) -> Result<Vec<ImagePayload>, AppError> {
        let mut updated = self.profiles.fetch_photos().await?.unwrap_or_default();
        updated.extend_from_slice(added);
        self.profiles.save_progress_photos(&updated).await?;
        Ok(updated)
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    /// Remove `index` from `snapshot` and persist the remainder in full.
    ///
    /// The in-memory gallery takes the post-removal array before the write.
    /// If the write fails it keeps that array, so page and store diverge
    /// until the next load.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] when `index` is out of range (no write)
    /// - [`AppError::NotAuthenticated`] / [`AppError::Store`] from the write
    pub async fn delete_one(&mut self, mut snapshot: Vec<ImagePayload>, index: usize) -> Result<(), AppError> {
        if index >= snapshot.len() {
            warn!(index, len = snapshot.len(), "delete index out of range");
            return Err(AppError::Validation(format!("no photo at index {index}")));
        }

        snapshot.remove(index);
        self.state = GalleryState::from_photos(snapshot);

        if let Err(e) = self.profiles.save_progress_photos(self.photos()).await {
            return Err(self.fail(e, DELETE_FAILED_MESSAGE, "failed to save progress photos after delete"));
        }

        self.render();
        Ok(())
    }

    /// Delete using the gallery's own array as the snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`GalleryManager::delete_one`].
    pub async fn delete_shown(&mut self, index: usize) -> Result<(), AppError> {
        let snapshot = self.photos().to_vec();
        self.delete_one(snapshot, index).await
    }

    fn fail(&self, e: AppError, message: &str, context: &str) -> AppError {
        error!(error = %e, "{context}");
        self.surface.alert(message);
        e
    }

    // =========================================================================
    // MODAL
    // =========================================================================

    pub fn open_modal(&mut self, image: ImagePayload) {
        if let Err(e) = self.surface.show_modal(Some(&image)) {
            warn!(error = %e, "photo modal missing");
            return;
        }
        self.modal = Some(image);
    }

    /// Open the modal on the photo stored at `index`.
    ///
    /// Returns `false` if there is no valid photo there.
    pub fn open_photo(&mut self, index: usize) -> bool {
        match self.photos().get(index).filter(|p| p.is_valid()).cloned() {
            Some(image) => {
                self.open_modal(image);
                self.modal.is_some()
            }
            None => false,
        }
    }

    pub fn close_modal(&mut self) {
        if let Err(e) = self.surface.show_modal(None) {
            warn!(error = %e, "photo modal missing");
        }
        self.modal = None;
    }

    /// Escape closes the modal when it is open; other keys are ignored.
    pub fn handle_key(&mut self, key: &str) {
        if key == ESCAPE_KEY && self.modal.is_some() {
            self.close_modal();
        }
    }

    pub fn handle_modal_click(&mut self, target: ModalClick) {
        match target {
            ModalClick::Backdrop | ModalClick::CloseButton => self.close_modal(),
            ModalClick::Content => {}
        }
    }
}

/// Build the gallery view for `photos`, skipping entries without the image
/// marker. Tiles keep their stored index.
#[must_use]
pub fn build_view(photos: &[ImagePayload]) -> GalleryView {
    if photos.is_empty() {
        return GalleryView::Placeholder(NO_PHOTOS_MESSAGE.to_owned());
    }

    let tiles = photos
        .iter()
        .enumerate()
        .filter_map(|(index, photo)| {
            if !photo.is_valid() {
                warn!(index, photo = %photo, "invalid photo skipped");
                return None;
            }
            Some(GalleryTile { index, alt: format!("Progress photo {}", index + 1), payload: photo.clone() })
        })
        .collect();
    GalleryView::Tiles(tiles)
}

#[cfg(test)]
#[path = "gallery_test.rs"]
mod tests;
