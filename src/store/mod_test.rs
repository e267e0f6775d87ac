use super::*;

#[test]
fn user_key_targets_users_collection() {
    let key = DocumentKey::user("abc123");
    assert_eq!(key.collection, "users");
    assert_eq!(key.path(), "users/abc123");
}

#[test]
fn store_error_codes_and_retry_hints() {
    assert_eq!(StoreError::NotFound { path: "users/x".into() }.error_code(), "E_STORE_NOT_FOUND");
    assert!(StoreError::Response { status: 503, body: String::new() }.retryable());
    assert!(!StoreError::Response { status: 403, body: String::new() }.retryable());
    assert!(!StoreError::NotFound { path: "users/x".into() }.retryable());
}
