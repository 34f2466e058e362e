//! Store-change notification types
//!
//! Deserializes the object store's "object created" notification: one or
//! more records each naming a bucket and a URL-safe-encoded object key.
//! Keys arrive `+`/percent-encoded and must be decoded before use.

use buildrelay_common::{decode_object_key, DecodeError};
use serde::Deserialize;

/// A store-change notification delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntity {
    /// URL-safe-encoded object key, exactly as delivered.
    pub key: String,
}

impl ObjectEntity {
    /// Decode the object key (`+` to space, then percent-decoding).
    pub fn decoded_key(&self) -> Result<String, DecodeError> {
        decode_object_key(&self.key)
    }
}
