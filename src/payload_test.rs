use super::*;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

// =============================================================================
// ImagePayload
// =============================================================================

#[test]
fn from_bytes_builds_data_url() {
    let payload = ImagePayload::from_bytes("image/png", b"hi");
    assert_eq!(payload.as_str(), "data:image/png;base64,aGk=");
    assert!(payload.is_valid());
    assert_eq!(payload.mime(), Some("image/png"));
}

#[test]
fn is_valid_requires_image_marker() {
    assert!(ImagePayload::new("data:image/jpeg;base64,AAAA").is_valid());
    assert!(!ImagePayload::new("data:application/pdf;base64,AAAA").is_valid());
    assert!(!ImagePayload::new("").is_valid());
    assert!(!ImagePayload::new("https://example.com/a.png").is_valid());
}

#[test]
fn mime_is_none_for_non_data_urls() {
    assert_eq!(ImagePayload::new("not a payload").mime(), None);
    assert_eq!(ImagePayload::new("data:,plain").mime(), None);
}

#[test]
fn display_truncates_long_payloads() {
    let payload = ImagePayload::from_bytes("image/png", &[7u8; 300]);
    let shown = payload.to_string();
    assert!(shown.starts_with("data:image/png;base64,"));
    assert!(shown.ends_with("bytes)"));
    assert!(shown.len() < payload.as_str().len());
}

#[test]
fn serializes_as_plain_string() {
    let payload = ImagePayload::new("data:image/gif;base64,R0lG");
    assert_eq!(serde_json::to_value(&payload).unwrap(), serde_json::json!("data:image/gif;base64,R0lG"));
}

// =============================================================================
// detect_mime
// =============================================================================

#[test]
fn detect_mime_prefers_extension() {
    assert_eq!(detect_mime("front.JPG", b""), "image/jpeg");
    assert_eq!(detect_mime("side.png", b"garbage"), "image/png");
}

#[test]
fn detect_mime_sniffs_when_extension_unknown() {
    assert_eq!(detect_mime("camera-upload", PNG_MAGIC), "image/png");
}

#[test]
fn detect_mime_falls_back_to_octet_stream() {
    assert_eq!(detect_mime("blob", b"plain bytes"), "application/octet-stream");
}

// =============================================================================
// encode / encode_all
// =============================================================================

#[tokio::test]
async fn encode_reads_path_backed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week1.png");
    std::fs::write(&path, b"hi").unwrap();

    let payload = encode(&SelectedFile::from_path(&path)).await.unwrap();
    assert_eq!(payload.as_str(), "data:image/png;base64,aGk=");
}

#[tokio::test]
async fn encode_missing_file_reports_name() {
    let err = encode(&SelectedFile::from_path("/definitely/not/here.png"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("here.png"));
    assert_eq!(err.error_code(), "E_PAYLOAD_READ");
}

#[tokio::test]
async fn encode_all_keeps_selection_order() {
    let files = vec![
        SelectedFile::from_bytes("a.png", b"a".to_vec()),
        SelectedFile::from_bytes("b.jpg", b"b".to_vec()),
        SelectedFile::from_bytes("c.gif", b"c".to_vec()),
    ];
    let payloads = encode_all(&files).await.unwrap();
    let mimes: Vec<_> = payloads.iter().filter_map(ImagePayload::mime).collect();
    assert_eq!(mimes, vec!["image/png", "image/jpeg", "image/gif"]);
}

#[tokio::test]
async fn encode_all_fails_whole_batch_on_one_bad_file() {
    let files = vec![
        SelectedFile::from_bytes("a.png", b"a".to_vec()),
        SelectedFile::from_path("/definitely/not/here.png"),
    ];
    assert!(encode_all(&files).await.is_err());
}
