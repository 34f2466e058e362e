//! AWS client settings following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Component-specific settings
//! live in their own crates; this module holds the settings shared by
//! every AWS client in the pipeline.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_credential_types::provider::SharedCredentialsProvider;
use std::env;

/// Shared settings for constructing AWS SDK clients.
#[derive(Debug, Clone)]
pub struct AwsSettings {
    /// AWS region for the object store and workflow orchestrator
    pub region: String,

    /// Optional endpoint override (LocalStack and similar emulators)
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Load AWS settings from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self {
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Build an SDK config from the shared settings.
///
/// When an endpoint override is configured (LocalStack), dummy credentials
/// are injected so the SDK does not consult the default provider chain.
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    match settings.endpoint_url.as_deref() {
        Some(endpoint_url) => {
            tracing::info!("Using custom AWS endpoint: {}", endpoint_url);

            let credentials = Credentials::new(
                "test-access-key",
                "test-secret-key",
                None,
                None,
                "buildrelay-endpoint-override",
            );

            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(settings.region.clone()))
                .endpoint_url(endpoint_url)
                .credentials_provider(SharedCredentialsProvider::new(credentials))
                .load()
                .await
        }
        None => {
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(settings.region.clone()))
                .load()
                .await
        }
    }
}
