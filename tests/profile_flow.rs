use std::sync::Arc;

use fitfolio::auth::{LOGIN_FAILED_MESSAGE, SIGNUP_SUCCESS_MESSAGE};
use fitfolio::config::HOME_PAGE;
use fitfolio::error::AppError;
use fitfolio::events::{App, UiEvent};
use fitfolio::gallery::GalleryState;
use fitfolio::identity::memory::MemoryIdentityProvider;
use fitfolio::payload::SelectedFile;
use fitfolio::store::DocumentKey;
use fitfolio::store::memory::MemoryStore;
use fitfolio::ui::{MemorySurface, NO_PHOTOS_MESSAGE, Surface, ids};

fn full_page() -> MemorySurface {
    MemorySurface::with_elements(&[
        ids::LOGIN_EMAIL,
        ids::LOGIN_PASSWORD,
        ids::SIGNUP_NAME,
        ids::SIGNUP_EMAIL,
        ids::SIGNUP_PASSWORD,
        ids::USERNAME,
        ids::EMAIL,
        ids::GOAL,
        ids::PHOTO_GALLERY,
        ids::PROGRESS_PHOTOS,
        ids::PHOTO_MODAL,
    ])
}

fn photo_file(name: &str) -> SelectedFile {
    SelectedFile::from_bytes(name, format!("pixels of {name}").into_bytes())
}

#[tokio::test]
async fn signup_login_upload_delete_and_goal() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryStore::new());
    let surface = Arc::new(full_page());
    let mut app = App::new(provider, store.clone(), surface.clone());

    // Signup.
    app.dispatch(UiEvent::ShowSignup).await.unwrap();
    surface.set_field_value(ids::SIGNUP_NAME, "Ana").unwrap();
    surface.set_field_value(ids::SIGNUP_EMAIL, "ana@example.com").unwrap();
    surface.set_field_value(ids::SIGNUP_PASSWORD, "secret1").unwrap();
    app.dispatch(UiEvent::SignupSubmitted).await.unwrap();
    assert_eq!(surface.alerts(), vec![SIGNUP_SUCCESS_MESSAGE.to_owned()]);

    // Login from a fresh session.
    app.session().sign_out().await;
    surface.set_field_value(ids::LOGIN_EMAIL, "ana@example.com").unwrap();
    surface.set_field_value(ids::LOGIN_PASSWORD, "secret1").unwrap();
    app.dispatch(UiEvent::LoginSubmitted).await.unwrap();
    assert_eq!(surface.location().as_deref(), Some(HOME_PAGE));
    let uid = app.session().current().await.unwrap().uid;

    // Profile page: the document exists but holds no photos yet.
    app.dispatch(UiEvent::PageLoaded).await.unwrap();
    assert_eq!(surface.field(ids::USERNAME).as_deref(), Some("Ana"));
    assert_eq!(app.gallery().state(), &GalleryState::Empty);
    assert_eq!(
        surface.gallery().map(|v| v.tiles().is_empty()),
        Some(true),
        "expected placeholder: {NO_PHOTOS_MESSAGE}"
    );

    // Upload two, then one more.
    app.dispatch(UiEvent::SavePhotosClicked(vec![photo_file("front.png"), photo_file("side.jpg")]))
        .await
        .unwrap();
    app.dispatch(UiEvent::SavePhotosClicked(vec![photo_file("back.webp")]))
        .await
        .unwrap();
    assert_eq!(app.gallery().photos().len(), 3);
    assert!(app.gallery().photos().iter().all(|p| p.is_valid()));

    // Delete the middle photo.
    let before = app.gallery().photos().to_vec();
    app.dispatch(UiEvent::DeletePhotoClicked(1)).await.unwrap();
    assert_eq!(app.gallery().photos(), &[before[0].clone(), before[2].clone()]);

    // Goal update leaves the photos untouched.
    surface.set_field_value(ids::GOAL, "10 pull-ups").unwrap();
    app.dispatch(UiEvent::SaveProfileClicked).await.unwrap();

    let doc = store.snapshot(&DocumentKey::user(&uid)).await.unwrap();
    assert_eq!(doc["goal"], "10 pull-ups");
    assert_eq!(doc["name"], "Ana");
    assert_eq!(doc["progressPhotos"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn wrong_password_keeps_user_on_login_page() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryStore::new());
    let surface = Arc::new(full_page());
    let mut app = App::new(provider, store, surface.clone());

    surface.set_field_value(ids::LOGIN_EMAIL, "nobody@example.com").unwrap();
    surface.set_field_value(ids::LOGIN_PASSWORD, "whatever").unwrap();
    let err = app.dispatch(UiEvent::LoginSubmitted).await.unwrap_err();

    assert!(matches!(err, AppError::Auth(_)));
    assert_eq!(surface.alerts(), vec![LOGIN_FAILED_MESSAGE.to_owned()]);
    assert!(surface.location().is_none());
}

#[tokio::test]
async fn profile_writes_before_login_are_rejected() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryStore::new());
    let surface = Arc::new(full_page());
    let mut app = App::new(provider, store.clone(), surface.clone());

    surface.set_field_value(ids::GOAL, "anything").unwrap();
    let err = app.dispatch(UiEvent::SaveProfileClicked).await.unwrap_err();

    assert!(matches!(err, AppError::NotAuthenticated));
    assert!(store.writes().await.is_empty());
    assert_eq!(app.profiles().get_profile().await.unwrap().name, "");
}
