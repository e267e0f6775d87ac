//! Image payloads: self-describing data-URL strings.
//!
//! A payload is `data:<mime>;base64,<data>`. Only payloads starting with
//! [`IMAGE_MARKER`] are treated as renderable images; anything else is kept
//! in storage untouched but skipped by the gallery.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

pub const IMAGE_MARKER: &str = "data:image";
const FALLBACK_MIME: &str = "application/octet-stream";

// =============================================================================
// PAYLOAD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build a payload from raw bytes with an explicit media type.
    #[must_use]
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// True when the payload carries the image marker.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(IMAGE_MARKER)
    }

    /// Media type between `data:` and the first `;` or `,`.
    #[must_use]
    pub fn mime(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let end = rest.find([';', ',']).unwrap_or(rest.len());
        Some(&rest[..end]).filter(|m| !m.is_empty())
    }
}

impl fmt::Display for ImagePayload {
    /// Payloads can be megabytes long; display a short prefix only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 32;
        match self.0.char_indices().nth(PREVIEW) {
            Some((cut, _)) => write!(f, "{}... ({} bytes)", &self.0[..cut], self.0.len()),
            None => f.write_str(&self.0),
        }
    }
}

// =============================================================================
// SELECTED FILES
// =============================================================================

#[derive(Debug, Clone)]
enum FileContent {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A local file picked for upload, not yet encoded.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    content: FileContent,
}

impl SelectedFile {
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self { name, content: FileContent::Path(path.to_path_buf()) }
    }

    #[must_use]
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), content: FileContent::Bytes(bytes) }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl ErrorCode for PayloadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_PAYLOAD_READ",
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Media type for a file: extension first, then content sniffing.
#[must_use]
pub fn detect_mime(name: &str, bytes: &[u8]) -> String {
    if let Some(mime) = mime_guess::from_path(name).first() {
        return mime.essence_str().to_owned();
    }
    infer::get(bytes).map_or_else(|| FALLBACK_MIME.to_owned(), |kind| kind.mime_type().to_owned())
}

/// Read and encode one file.
///
/// # Errors
///
/// Returns [`PayloadError::Read`] if a path-backed file cannot be read.
pub async fn encode(file: &SelectedFile) -> Result<ImagePayload, PayloadError> {
    let bytes = match &file.content {
        FileContent::Bytes(bytes) => bytes.clone(),
        FileContent::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|source| PayloadError::Read { name: file.name.clone(), source })?,
    };
    let mime = detect_mime(&file.name, &bytes);
    Ok(ImagePayload::from_bytes(&mime, &bytes))
}

/// Encode every file concurrently and wait for all of them.
///
/// Results are in selection order. A single failure fails the whole batch,
/// so callers never see a partial set.
///
/// # Errors
///
/// Returns the first [`PayloadError`] encountered.
pub async fn encode_all(files: &[SelectedFile]) -> Result<Vec<ImagePayload>, PayloadError> {
    futures::future::try_join_all(files.iter().map(encode)).await
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;
