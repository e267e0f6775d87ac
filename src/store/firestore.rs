//! Firestore REST client.
//!
//! Documents travel as typed Firestore values (`stringValue`, `arrayValue`,
//! ...). `encode_fields` / `decode_fields` convert between those and plain
//! JSON so the rest of the crate only sees [`Document`].

use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::warn;

use super::{Document, DocumentKey, DocumentStore, StoreError};
use crate::config::FirebaseConfig;
use crate::identity::Identity;

// =============================================================================
// CLIENT
// =============================================================================

pub struct FirestoreClient {
    http: reqwest::Client,
    documents_url: String,
}

impl FirestoreClient {
    /// # Errors
    ///
    /// Returns [`StoreError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;
        let documents_url = format!(
            "{}/projects/{}/databases/(default)/documents",
            config.firestore_base_url, config.project_id
        );
        Ok(Self { http, documents_url })
    }

    fn document_url(&self, key: &DocumentKey) -> String {
        format!("{}/{}", self.documents_url, key.path())
    }

    async fn patch(
        &self,
        caller: &Identity,
        key: &DocumentKey,
        document: Document,
        query: &[(&str, &str)],
    ) -> Result<(), StoreError> {
        let body = json!({ "fields": encode_fields(&document) });
        let response = self
            .http
            .patch(self.document_url(key))
            .bearer_auth(&caller.id_token)
            .query(query)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        if status == 404 {
            return Err(StoreError::NotFound { path: key.path() });
        }
        Err(StoreError::Response { status, body: text })
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreClient {
    async fn get(&self, caller: &Identity, key: &DocumentKey) -> Result<Option<Document>, StoreError> {
        let response = self
            .http
            .get(self.document_url(key))
            .bearer_auth(&caller.id_token)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        match status {
            404 => Ok(None),
            200..=299 => parse_document(&text).map(Some),
            _ => Err(StoreError::Response { status, body: text }),
        }
    }

    async fn set(&self, caller: &Identity, key: &DocumentKey, document: Document) -> Result<(), StoreError> {
        self.patch(caller, key, document, &[]).await
    }

    async fn update(&self, caller: &Identity, key: &DocumentKey, fields: Document) -> Result<(), StoreError> {
        let mut query: Vec<(&str, &str)> = fields
            .keys()
            .map(|field| ("updateMask.fieldPaths", field.as_str()))
            .collect();
        query.push(("currentDocument.exists", "true"));
        self.patch(caller, key, fields.clone(), &query).await
    }
}

// =============================================================================
// VALUE MAPPING
// =============================================================================

fn parse_document(json: &str) -> Result<Document, StoreError> {
    let raw: Value = serde_json::from_str(json).map_err(|e| StoreError::Parse(e.to_string()))?;
    match raw.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields),
        Some(other) => Err(StoreError::Parse(format!("fields is not an object: {other}"))),
        // Documents with no fields omit the key entirely.
        None => Ok(Document::new()),
    }
}

/// Encode plain JSON fields as Firestore typed values.
#[must_use]
pub fn encode_fields(document: &Document) -> Map<String, Value> {
    document
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode Firestore typed values back into plain JSON fields.
///
/// Fields of a kind this crate has no JSON form for (`bytesValue`,
/// `geoPointValue`, ...) are skipped with a warning; inside arrays they
/// decode as `null` so positions stay aligned.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] for a malformed value.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Document, StoreError> {
    let mut document = Document::new();
    for (field, value) in fields {
        match decode_value(value)? {
            Some(decoded) => {
                document.insert(field.clone(), decoded);
            }
            None => warn!(field = %field, "skipping field of unsupported value kind"),
        }
    }
    Ok(document)
}

/// `Ok(None)` for a well-formed value of an unsupported kind.
fn decode_value(value: &Value) -> Result<Option<Value>, StoreError> {
    let Some((kind, inner)) = value.as_object().and_then(|m| m.iter().next()) else {
        return Err(StoreError::Parse(format!("not a typed value: {value}")));
    };

    let decoded = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "referenceValue" => inner.clone(),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| StoreError::Parse(format!("bad integerValue: {inner}")))?
        }
        "arrayValue" => {
            let mut values = Vec::new();
            // Empty arrays come back as `{}`.
            if let Some(Value::Array(items)) = inner.get("values") {
                for item in items {
                    values.push(decode_value(item)?.unwrap_or_else(|| {
                        warn!("unsupported value kind in array; decoded as null");
                        Value::Null
                    }));
                }
            }
            Value::Array(values)
        }
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Value::Object(decode_fields(fields)?),
            _ => Value::Object(Map::new()),
        },
        _ => return Ok(None),
    };
    Ok(Some(decoded))
}

#[cfg(test)]
#[path = "firestore_test.rs"]
mod tests;
