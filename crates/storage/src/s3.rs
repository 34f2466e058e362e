//! AWS S3 object store implementation
//!
//! Production store with LocalStack support via the shared endpoint
//! override in [`AwsSettings`]. Path-style addressing is forced when an
//! endpoint override is configured, since emulators rarely support
//! virtual-hosted buckets.

use std::collections::HashMap;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use buildrelay_common::{load_sdk_config, AwsSettings};

use crate::{FetchedObject, ObjectStore, PutReceipt, StorageError};

/// AWS S3 implementation of [`ObjectStore`].
pub struct S3ObjectStore {
    client: S3Client,
    settings: AwsSettings,
}

impl S3ObjectStore {
    /// Create a new S3 object store from the shared AWS settings.
    pub async fn new(settings: AwsSettings) -> Self {
        let sdk_config = load_sdk_config(&settings).await;

        let client = match settings.endpoint_url {
            Some(_) => {
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .force_path_style(true)
                    .build();
                S3Client::from_conf(s3_config)
            }
            None => S3Client::new(&sdk_config),
        };

        Self { client, settings }
    }

    fn object_location(&self, bucket: &str, key: &str) -> String {
        match self.settings.endpoint_url.as_deref() {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                bucket, self.settings.region, key
            ),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<PutReceipt, StorageError> {
        tracing::info!(bucket = %bucket, key = %key, size = body.len(), "Uploading object to S3");

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .set_metadata(Some(metadata))
            .send()
            .await
            .map_err(|e| StorageError::Put(e.to_string()))?;

        let location = self.object_location(bucket, key);
        tracing::info!(location = %location, "Object uploaded successfully");

        Ok(PutReceipt { location })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<FetchedObject, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Get(e.to_string()))?;

        let content_type = output.content_type().map(str::to_string);
        let metadata = output.metadata().cloned().unwrap_or_default();

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Get(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(FetchedObject {
            body,
            content_type,
            metadata,
        })
    }
}
