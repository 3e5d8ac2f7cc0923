#![deny(missing_docs)]

//! # Endpoint Storage
//!
//! The persistence seam. The server wires a relational implementation; the
//! [`MemoryStore`] backs tests and the `--in-memory` mode.

use crate::endpoint::{EndpointRecord, HttpMethod};
use crate::error::{AppError, AppResult};
use crate::oas::EndpointDocument;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Persistence of endpoint records, unique on (`path`, `method`).
#[async_trait]
pub trait EndpointStore: Send + Sync {
    /// Looks up the record for one endpoint.
    async fn find_by_key(&self, path: &str, method: HttpMethod)
        -> AppResult<Option<EndpointRecord>>;

    /// Creates a record. Fails if the key already exists.
    async fn insert(
        &self,
        path: &str,
        method: HttpMethod,
        document: EndpointDocument,
    ) -> AppResult<EndpointRecord>;

    /// Replaces the document of an existing record.
    async fn update(&self, id: Uuid, document: EndpointDocument) -> AppResult<EndpointRecord>;

    /// Every record, most recently created first.
    async fn list_by_recency(&self) -> AppResult<Vec<EndpointRecord>>;

    /// A trivial read proving the store answers.
    async fn check(&self) -> AppResult<()>;

    /// Inserts or replaces the document for (`path`, `method`).
    ///
    /// The default is a lookup followed by `insert` or `update`, which races
    /// under concurrent writers. Backends with a native conditional upsert
    /// should override it.
    async fn upsert(
        &self,
        path: &str,
        method: HttpMethod,
        document: EndpointDocument,
    ) -> AppResult<EndpointRecord> {
        match self.find_by_key(path, method).await? {
            Some(existing) => self.update(existing.id, document).await,
            None => self.insert(path, method, document).await,
        }
    }
}

/// Mutex-guarded in-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<EndpointRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Vec<EndpointRecord>>> {
        self.records
            .lock()
            .map_err(|_| AppError::Database("memory store lock poisoned".into()))
    }

    fn new_record(path: &str, method: HttpMethod, document: EndpointDocument) -> EndpointRecord {
        let now = Utc::now().naive_utc();
        EndpointRecord {
            id: Uuid::new_v4(),
            path: path.to_string(),
            method,
            document,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(record: &mut EndpointRecord, document: EndpointDocument) -> EndpointRecord {
        record.document = document;
        record.updated_at = Utc::now().naive_utc();
        record.clone()
    }
}

#[async_trait]
impl EndpointStore for MemoryStore {
    async fn find_by_key(
        &self,
        path: &str,
        method: HttpMethod,
    ) -> AppResult<Option<EndpointRecord>> {
        let records = self.lock()?;
        Ok(records
            .iter()
            .find(|r| r.path == path && r.method == method)
            .cloned())
    }

    async fn insert(
        &self,
        path: &str,
        method: HttpMethod,
        document: EndpointDocument,
    ) -> AppResult<EndpointRecord> {
        let mut records = self.lock()?;
        if records.iter().any(|r| r.path == path && r.method == method) {
            return Err(AppError::Database(format!(
                "duplicate key: {} {} already exists",
                method, path
            )));
        }
        let record = Self::new_record(path, method, document);
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, document: EndpointDocument) -> AppResult<EndpointRecord> {
        let mut records = self.lock()?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::Database(format!("no endpoint with id {}", id)))?;
        Ok(Self::replace(record, document))
    }

    async fn list_by_recency(&self) -> AppResult<Vec<EndpointRecord>> {
        let records = self.lock()?;
        let mut listed: Vec<EndpointRecord> = records.iter().rev().cloned().collect();
        // Stable: records created in the same instant stay newest-first.
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn check(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }

    async fn upsert(
        &self,
        path: &str,
        method: HttpMethod,
        document: EndpointDocument,
    ) -> AppResult<EndpointRecord> {
        let mut records = self.lock()?;
        if let Some(existing) = records
            .iter_mut()
            .find(|r| r.path == path && r.method == method)
        {
            return Ok(Self::replace(existing, document));
        }
        let record = Self::new_record(path, method, document);
        records.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::{EndpointDetails, Examples};
    use serde_json::json;

    fn document(description: &str) -> EndpointDocument {
        EndpointDocument::Details(EndpointDetails {
            examples: Examples::default(),
            parameters: Vec::new(),
            description: Some(description.into()),
            request_schema: None,
            response_schema: json!({ "type": "object" }),
        })
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryStore::new();
        let created = store
            .insert("/users", HttpMethod::Get, document("list"))
            .await
            .unwrap();

        let found = store.find_by_key("/users", HttpMethod::Get).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(store
            .find_by_key("/users", HttpMethod::Post)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_key() {
        let store = MemoryStore::new();
        store
            .insert("/users", HttpMethod::Get, document("a"))
            .await
            .unwrap();
        let err = store
            .insert("/users", HttpMethod::Get, document("b"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_document() {
        let store = MemoryStore::new();
        let created = store
            .insert("/users", HttpMethod::Get, document("a"))
            .await
            .unwrap();
        let updated = store.update(created.id, document("b")).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.document, document("b"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = MemoryStore::new();
        assert!(store.update(Uuid::new_v4(), document("x")).await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row() {
        let store = MemoryStore::new();
        let first = store
            .upsert("/users", HttpMethod::Post, document("first"))
            .await
            .unwrap();
        let second = store
            .upsert("/users", HttpMethod::Post, document("second"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.len(), 1);
        assert_eq!(second.document, document("second"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        for path in ["/a", "/b", "/c"] {
            store
                .insert(path, HttpMethod::Get, document(path))
                .await
                .unwrap();
        }
        let paths: Vec<String> = store
            .list_by_recency()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["/c", "/b", "/a"]);
    }

    #[tokio::test]
    async fn test_check() {
        assert!(MemoryStore::new().check().await.is_ok());
    }
}
