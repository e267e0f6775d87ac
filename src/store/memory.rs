//! In-process document store for tests and offline runs.
//!
//! Keeps a log of every successful write so tests can assert exactly what
//! reached the store, and supports switching reads or writes into a failing
//! mode to exercise call-site error handling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, RwLock};

use super::{Document, DocumentKey, DocumentStore, StoreError};
use crate::identity::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Set,
    Update,
}

/// One successful write as observed by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub kind: WriteKind,
    pub key: DocumentKey,
    pub fields: Document,
}

#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DocumentKey, Document>>,
    writes: Mutex<Vec<WriteRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document directly, bypassing the write log.
    pub async fn seed(&self, key: DocumentKey, document: Document) {
        self.documents.write().await.insert(key, document);
    }

    /// Current contents of a document, bypassing fault injection.
    pub async fn snapshot(&self, key: &DocumentKey) -> Option<Document> {
        self.documents.read().await.get(key).cloned()
    }

    pub async fn writes(&self) -> Vec<WriteRecord> {
        self.writes.lock().await.clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Response { status: 503, body: "store unavailable".into() });
        }
        Ok(())
    }

    async fn record(&self, kind: WriteKind, key: &DocumentKey, fields: Document) {
        self.writes.lock().await.push(WriteRecord { kind, key: key.clone(), fields });
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, _caller: &Identity, key: &DocumentKey) -> Result<Option<Document>, StoreError> {
        Self::check(&self.fail_reads)?;
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn set(&self, _caller: &Identity, key: &DocumentKey, document: Document) -> Result<(), StoreError> {
        Self::check(&self.fail_writes)?;
        self.documents
            .write()
            .await
            .insert(key.clone(), document.clone());
        self.record(WriteKind::Set, key, document).await;
        Ok(())
    }

    async fn update(&self, _caller: &Identity, key: &DocumentKey, fields: Document) -> Result<(), StoreError> {
        Self::check(&self.fail_writes)?;
        {
            let mut documents = self.documents.write().await;
            let Some(existing) = documents.get_mut(key) else {
                return Err(StoreError::NotFound { path: key.path() });
            };
            for (field, value) in &fields {
                existing.insert(field.clone(), value.clone());
            }
        }
        self.record(WriteKind::Update, key, fields).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
