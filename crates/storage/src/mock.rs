//! Mock object store implementation
//!
//! Stores objects in memory for test assertions and supports a
//! programmed failure for error-path tests. Thread-safe via `Arc<Mutex<>>`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{FetchedObject, ObjectStore, PutReceipt, StorageError};

/// A recorded object in the mock store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

/// Mock object store that records puts for test assertions.
#[derive(Debug, Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockObjectStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Program every subsequent call to fail with the given detail.
    pub fn fail_with(&self, detail: impl Into<String>) {
        *self
            .fail_with
            .lock()
            .expect("fail_with lock poisoned — prior test panicked") = Some(detail.into());
    }

    /// Return the object stored under `bucket`/`key`, if any.
    pub fn stored(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .expect("objects lock poisoned — prior test panicked")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of objects currently stored.
    pub fn object_count(&self) -> usize {
        self.objects
            .lock()
            .expect("objects lock poisoned — prior test panicked")
            .len()
    }

    fn programmed_failure(&self) -> Option<String> {
        self.fail_with
            .lock()
            .expect("fail_with lock poisoned — prior test panicked")
            .clone()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<PutReceipt, StorageError> {
        if let Some(detail) = self.programmed_failure() {
            return Err(StorageError::Put(detail));
        }

        tracing::debug!(bucket = %bucket, key = %key, "Mock store: recording put");
        self.objects
            .lock()
            .map_err(|e| StorageError::Put(format!("objects lock poisoned: {e}")))?
            .insert(
                (bucket.to_string(), key.to_string()),
                StoredObject {
                    body,
                    content_type: content_type.to_string(),
                    metadata,
                },
            );

        Ok(PutReceipt {
            location: format!("s3://{bucket}/{key}"),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<FetchedObject, StorageError> {
        if let Some(detail) = self.programmed_failure() {
            return Err(StorageError::Get(detail));
        }

        let stored = self
            .stored(bucket, key)
            .ok_or_else(|| StorageError::Get(format!("no such object: {bucket}/{key}")))?;

        Ok(FetchedObject {
            body: stored.body,
            content_type: Some(stored.content_type),
            metadata: stored.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // STO-U02: put then get round-trips body, content type, and metadata
    #[tokio::test]
    async fn test_mock_put_then_get() {
        let store = MockObjectStore::new();
        let mut metadata = HashMap::new();
        metadata.insert("commit".to_string(), "abc123".to_string());

        store
            .put_object("global-builds", "abc123.zip", b"payload".to_vec(), "application/zip", metadata)
            .await
            .unwrap();

        let fetched = store.get_object("global-builds", "abc123.zip").await.unwrap();
        assert_eq!(fetched.body, b"payload");
        assert_eq!(fetched.content_type.as_deref(), Some("application/zip"));
        assert_eq!(fetched.metadata["commit"], "abc123");
    }

    // STO-U03: overwrite is last-write-wins
    #[tokio::test]
    async fn test_mock_overwrite() {
        let store = MockObjectStore::new();

        store
            .put_object("b", "k", b"one".to_vec(), "text/plain", HashMap::new())
            .await
            .unwrap();
        store
            .put_object("b", "k", b"two".to_vec(), "text/plain", HashMap::new())
            .await
            .unwrap();

        assert_eq!(store.object_count(), 1);
        assert_eq!(store.stored("b", "k").unwrap().body, b"two");
    }

    // STO-U04: programmed failure surfaces as a Put error
    #[tokio::test]
    async fn test_mock_programmed_failure() {
        let store = MockObjectStore::new();
        store.fail_with("disk full");

        let err = store
            .put_object("b", "k", vec![], "text/plain", HashMap::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(store.object_count(), 0);
    }
}
