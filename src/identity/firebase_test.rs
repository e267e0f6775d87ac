use super::*;
use crate::config::{DEFAULT_AUTH_BASE_URL, HttpTimeouts};

fn config() -> FirebaseConfig {
    FirebaseConfig {
        api_key: "k123".into(),
        project_id: "fit-demo".into(),
        auth_base_url: DEFAULT_AUTH_BASE_URL.into(),
        firestore_base_url: "http://unused".into(),
        timeouts: HttpTimeouts::default(),
    }
}

#[test]
fn endpoint_includes_method_and_key() {
    let client = FirebaseAuthClient::new(&config()).unwrap();
    assert_eq!(
        client.endpoint(SIGN_IN),
        "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=k123"
    );
}

#[test]
fn credential_request_uses_camel_case() {
    let body = CredentialRequest { email: "a@b.c", password: "secret", return_secure_token: true };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["returnSecureToken"], serde_json::json!(true));
    assert_eq!(json["email"], "a@b.c");
}

#[test]
fn parse_response_extracts_identity() {
    let json = r#"{
        "kind": "identitytoolkit#SignupNewUserResponse",
        "idToken": "tok-1",
        "email": "ana@example.com",
        "refreshToken": "refresh",
        "expiresIn": "3600",
        "localId": "uid-42"
    }"#;
    let identity = parse_response(json).unwrap();
    assert_eq!(identity.uid, "uid-42");
    assert_eq!(identity.email, "ana@example.com");
    assert_eq!(identity.id_token, "tok-1");
}

#[test]
fn parse_response_rejects_missing_local_id() {
    let err = parse_response(r#"{"idToken":"t"}"#).unwrap_err();
    assert!(matches!(err, AuthError::Parse(_)));
}

#[test]
fn parse_error_keeps_leading_code() {
    let body = r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters","errors":[]}}"#;
    match parse_error(400, body) {
        AuthError::Rejected { status, code } => {
            assert_eq!(status, 400);
            assert_eq!(code, "WEAK_PASSWORD");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn parse_error_falls_back_to_status() {
    match parse_error(502, "<html>bad gateway</html>") {
        AuthError::Rejected { code, .. } => assert_eq!(code, "HTTP_502"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn transport_error_does_not_leak_api_key() {
    let config = FirebaseConfig { auth_base_url: "http://127.0.0.1:1/v1".into(), ..config() };
    let client = FirebaseAuthClient::new(&config).unwrap();

    let err = client.verify_identity("a@b.c", "secret").await.unwrap_err();

    let AuthError::Request(message) = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert!(!message.contains("k123"), "{message}");
    assert!(!err.to_string().contains("key="));
}
