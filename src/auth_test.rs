use serde_json::json;

use super::*;
use crate::identity::memory::MemoryIdentityProvider;
use crate::identity::{AuthError, Session};
use crate::store::DocumentKey;
use crate::store::memory::MemoryStore;
use crate::ui::MemorySurface;

struct Harness {
    flow: AuthFlow,
    provider: Arc<MemoryIdentityProvider>,
    store: Arc<MemoryStore>,
    surface: Arc<MemorySurface>,
    session: Session,
}

fn harness() -> Harness {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryStore::new());
    let surface = Arc::new(MemorySurface::auth_page());
    let session = Session::new();
    let flow = AuthFlow::new(provider.clone(), ProfileStore::new(store.clone(), session.clone()), surface.clone());
    Harness { flow, provider, store, surface, session }
}

// =============================================================================
// signup
// =============================================================================

#[tokio::test]
async fn signup_rejects_short_passwords_without_provider_call() {
    let mut h = harness();
    for password in ["", "a", "12345", "ñañañ"] {
        let err = h.flow.signup("Ana", "ana@example.com", password).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "password {password:?}");
    }
    assert_eq!(h.provider.calls(), 0);
    assert!(h.store.writes().await.is_empty());
    assert!(h.surface.alerts().iter().all(|a| a == SHORT_PASSWORD_MESSAGE));
}

#[tokio::test]
async fn signup_accepts_exactly_six_characters() {
    let mut h = harness();
    assert!(h.flow.signup("Ana", "ana@example.com", "123456").await.is_ok());
    assert_eq!(h.provider.calls(), 1);
}

#[tokio::test]
async fn signup_counts_password_length_in_utf16_units() {
    let mut h = harness();
    // Three astral-plane characters are six UTF-16 code units.
    assert!(h.flow.signup("Ana", "ana@example.com", "😀😀😀").await.is_ok());
    assert_eq!(h.provider.calls(), 1);
    assert!(h.surface.alerts().iter().all(|a| a != SHORT_PASSWORD_MESSAGE));
}

#[tokio::test]
async fn signup_creates_profile_document_and_resets_form() {
    let mut h = harness();
    h.flow.show_signup();
    h.surface.set_field_value(ids::SIGNUP_NAME, "Ana").unwrap();

    let identity = h.flow.signup("Ana", "ana@example.com", "secret1").await.unwrap();

    let doc = h.store.snapshot(&DocumentKey::user(&identity.uid)).await.unwrap();
    assert_eq!(doc["name"], json!("Ana"));
    assert_eq!(doc["email"], json!("ana@example.com"));
    assert_eq!(doc.len(), 2);

    assert_eq!(h.session.current().await, Some(identity));
    assert_eq!(h.surface.field(ids::SIGNUP_NAME).as_deref(), Some(""));
    assert_eq!(h.surface.alerts(), vec![SIGNUP_SUCCESS_MESSAGE.to_owned()]);
    assert_eq!(h.flow.mode(), FormMode::Login);
}

#[tokio::test]
async fn signup_duplicate_email_alerts_generic_message() {
    let mut h = harness();
    h.flow.signup("Ana", "ana@example.com", "secret1").await.unwrap();

    let err = h.flow.signup("Ana", "ana@example.com", "secret2").await.unwrap_err();

    assert!(matches!(err, AppError::Auth(AuthError::Rejected { .. })));
    assert_eq!(h.surface.alerts().last().map(String::as_str), Some(SIGNUP_FAILED_MESSAGE));
}

#[tokio::test]
async fn signup_store_failure_keeps_identity_without_document() {
    let mut h = harness();
    h.store.fail_writes(true);

    let err = h.flow.signup("Ana", "ana@example.com", "secret1").await.unwrap_err();
    assert!(matches!(err, AppError::Store(_)));
    assert_eq!(h.surface.alerts(), vec![SIGNUP_FAILED_MESSAGE.to_owned()]);

    // The account exists even though its profile document does not.
    let identity = h.provider.verify_identity("ana@example.com", "secret1").await.unwrap();
    assert!(h.store.snapshot(&DocumentKey::user(&identity.uid)).await.is_none());
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_sets_session_and_navigates_home() {
    let mut h = harness();
    h.provider.create_identity("ana@example.com", "secret1").await.unwrap();

    let identity = h.flow.login("ana@example.com", "secret1").await.unwrap();

    assert_eq!(h.session.current().await.map(|i| i.uid), Some(identity.uid));
    assert_eq!(h.surface.location().as_deref(), Some(HOME_PAGE));
    assert!(h.surface.alerts().is_empty());
}

#[tokio::test]
async fn login_failure_alerts_without_navigation() {
    let mut h = harness();

    let err = h.flow.login("ana@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, AppError::Auth(_)));
    assert_eq!(h.surface.alerts(), vec![LOGIN_FAILED_MESSAGE.to_owned()]);
    assert!(h.surface.location().is_none());
    assert!(h.session.current().await.is_none());
}

// =============================================================================
// form mode
// =============================================================================

#[test]
fn form_mode_toggles() {
    let mut h = harness();
    assert_eq!(h.flow.mode(), FormMode::Login);
    h.flow.show_signup();
    assert_eq!(h.flow.mode(), FormMode::Signup);
    h.flow.show_login();
    assert_eq!(h.flow.mode(), FormMode::Login);
}
