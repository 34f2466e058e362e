//! buildrelay object store boundary
//!
//! The pipeline treats the store as a durable key-addressed blob service
//! with string metadata. This crate provides:
//! - The [`ObjectStore`] trait the publisher writes through
//! - An AWS S3 implementation for production and LocalStack
//! - An in-memory mock that records puts for test assertions
//! - Store-change notification types consumed by the replication trigger

pub mod mock;
pub mod notification;
pub mod s3;

use std::collections::HashMap;

use thiserror::Error;

pub use mock::MockObjectStore;
pub use notification::{NotificationRecord, StoreNotification};
pub use s3::S3ObjectStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Failed to upload object: {0}")]
    Put(String),

    #[error("Failed to fetch object: {0}")]
    Get(String),
}

/// Receipt for a stored object.
#[derive(Debug, Clone)]
pub struct PutReceipt {
    /// Human-readable location of the stored object, e.g.
    /// `https://global-builds.s3.us-east-1.amazonaws.com/abc123.zip`
    pub location: String,
}

/// An object fetched from the store.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// Object store trait for different storage backends.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object under `bucket`/`key`. Overwrites are last-write-wins.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<PutReceipt, StorageError>;

    /// Fetch an object by key, returning its payload and headers.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<FetchedObject, StorageError>;
}
