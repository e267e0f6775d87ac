//! Shared fixtures for unit tests.

use std::sync::Arc;

use serde_json::json;

use crate::identity::{Identity, Session};
use crate::payload::ImagePayload;
use crate::profile::ProfileStore;
use crate::store::memory::MemoryStore;
use crate::store::{Document, DocumentKey};

pub const UID: &str = "uid-ana";

#[must_use]
pub fn identity() -> Identity {
    Identity { uid: UID.into(), email: "ana@example.com".into(), id_token: "token".into() }
}

/// A valid payload whose body encodes `tag`, so tests can tell photos apart.
#[must_use]
pub fn photo(tag: &str) -> ImagePayload {
    ImagePayload::from_bytes("image/png", tag.as_bytes())
}

#[must_use]
pub fn photos_json(photos: &[ImagePayload]) -> serde_json::Value {
    json!(photos.iter().map(ImagePayload::as_str).collect::<Vec<_>>())
}

/// Store holding a profile document for [`UID`] with the given photos.
pub async fn seeded_store(photos: &[ImagePayload]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let mut document = Document::new();
    document.insert("name".into(), json!("Ana"));
    document.insert("email".into(), json!("ana@example.com"));
    document.insert("progressPhotos".into(), photos_json(photos));
    store.seed(DocumentKey::user(UID), document).await;
    store
}

#[must_use]
pub fn signed_in_profiles(store: &Arc<MemoryStore>) -> ProfileStore {
    ProfileStore::new(store.clone(), Session::signed_in(identity()))
}

pub async fn stored_photos(store: &MemoryStore) -> Vec<ImagePayload> {
    store
        .snapshot(&DocumentKey::user(UID))
        .await
        .and_then(|doc| doc.get("progressPhotos").cloned())
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}
