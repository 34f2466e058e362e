//! Build publisher
//!
//! Fetches one artifact from the gateway by commit id and uploads it to
//! the central build bucket with descriptive metadata. One logical request
//! in, one structured result out: every failure is captured and turned
//! into the failure variant, never an escaping fault. Retries are the
//! caller's responsibility.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use buildrelay_common::{iso_timestamp, InvocationResponse};
use buildrelay_storage::ObjectStore;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bound on the artifact fetch; all other calls use collaborator defaults.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Identity recorded in the published object's metadata.
pub const UPLOADER_IDENTITY: &str = "build-publisher";

const USER_AGENT_VALUE: &str = "build-publisher/1.0";

/// Publisher configuration, read once at process start.
#[derive(Clone)]
pub struct PublisherConfig {
    /// Base URL of the artifact gateway
    pub gateway_base_url: String,

    /// Shared-secret token forwarded to the gateway when it requires auth
    pub gateway_token: Option<String>,

    /// Central bucket published builds land in
    pub build_bucket: String,

    /// Fetch bound; fixed at [`FETCH_TIMEOUT`] outside of tests
    pub fetch_timeout: Duration,
}

impl std::fmt::Debug for PublisherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublisherConfig")
            .field("gateway_base_url", &self.gateway_base_url)
            .field(
                "gateway_token",
                &self.gateway_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("build_bucket", &self.build_bucket)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

impl PublisherConfig {
    /// Load publisher configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self {
            gateway_base_url: std::env::var("GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "http://host.docker.internal:3000".to_string()),
            gateway_token: std::env::var("GATEWAY_TOKEN").ok().filter(|t| !t.is_empty()),
            build_bucket: std::env::var("BUILD_BUCKET")
                .unwrap_or_else(|_| "global-builds".to_string()),
            fetch_timeout: FETCH_TIMEOUT,
        }
    }
}

/// Invocation payload for one publish.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishRequest {
    pub commit: Option<String>,
}

impl PublishRequest {
    /// Parse the raw invocation body.
    pub fn from_body(body: &[u8]) -> Result<Self, PublishError> {
        if body.is_empty() {
            return Err(PublishError::MissingBody);
        }
        serde_json::from_slice(body).map_err(|e| PublishError::InvalidBody(e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("request body is missing")]
    MissingBody,

    #[error("request body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("commit value is missing from request body")]
    MissingCommit,

    #[error("failed to download artifact: gateway returned status {status}")]
    FetchStatus { status: u16 },

    #[error("failed to download artifact: {0}")]
    FetchTransport(String),

    #[error("failed to upload artifact: {0}")]
    Upload(String),
}

/// Success shape; field names are the result wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishSuccess {
    pub message: String,
    pub commit: String,
    pub file_name: String,
    pub file_size: u64,
    pub storage_location: String,
    pub timestamp: String,
}

/// Failure shape, uniform across failure classes; `error` preserves the
/// fetch-vs-upload distinction for observability.
#[derive(Debug, Clone, Serialize)]
pub struct PublishFailure {
    pub message: String,
    pub error: String,
    pub timestamp: String,
}

/// Tagged publish result; callers pattern-match exhaustively.
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    Success(PublishSuccess),
    Failure(PublishFailure),
}

impl PublishOutcome {
    pub fn from_error(error: PublishError) -> Self {
        PublishOutcome::Failure(PublishFailure {
            message: "Error processing build request".to_string(),
            error: error.to_string(),
            timestamp: iso_timestamp(),
        })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PublishOutcome::Success(_) => 200,
            PublishOutcome::Failure(_) => 500,
        }
    }

    pub fn into_invocation_response(self) -> InvocationResponse {
        match self {
            PublishOutcome::Success(success) => InvocationResponse::ok(&success),
            PublishOutcome::Failure(failure) => InvocationResponse::internal_error(&failure),
        }
    }
}

/// The build publisher component.
pub struct BuildPublisher {
    http: reqwest::Client,
    store: Arc<dyn ObjectStore>,
    config: PublisherConfig,
}

impl BuildPublisher {
    pub fn new(store: Arc<dyn ObjectStore>, config: PublisherConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            store,
            config,
        }
    }

    /// Publish one build. Never returns an error past this boundary.
    pub async fn publish(&self, request: PublishRequest) -> PublishOutcome {
        match self.try_publish(request).await {
            Ok(success) => {
                tracing::info!(
                    commit = %success.commit,
                    file_name = %success.file_name,
                    file_size = success.file_size,
                    location = %success.storage_location,
                    "Build processed successfully"
                );
                PublishOutcome::Success(success)
            }
            Err(error) => {
                tracing::error!(error = %error, "Error processing build request");
                PublishOutcome::from_error(error)
            }
        }
    }

    async fn try_publish(&self, request: PublishRequest) -> Result<PublishSuccess, PublishError> {
        let commit = request
            .commit
            .filter(|c| !c.is_empty())
            .ok_or(PublishError::MissingCommit)?;

        let url = format!(
            "{}/files/{}",
            self.config.gateway_base_url.trim_end_matches('/'),
            commit
        );
        tracing::info!(commit = %commit, url = %url, "Downloading artifact from gateway");

        let mut fetch = self
            .http
            .get(&url)
            .timeout(self.config.fetch_timeout)
            .header(USER_AGENT, USER_AGENT_VALUE);
        if let Some(token) = &self.config.gateway_token {
            fetch = fetch.bearer_auth(token);
        }

        let response = fetch
            .send()
            .await
            .map_err(|e| PublishError::FetchTransport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(PublishError::FetchStatus {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let payload = response
            .bytes()
            .await
            .map_err(|e| PublishError::FetchTransport(e.to_string()))?;

        let file_name = format!("{commit}.zip");
        let file_size = payload.len() as u64;
        tracing::info!(
            file_size,
            content_type = %content_type,
            "Artifact downloaded successfully"
        );

        let upload_timestamp = iso_timestamp();
        let mut metadata = HashMap::new();
        metadata.insert("commit".to_string(), commit.clone());
        metadata.insert("uploaded-by".to_string(), UPLOADER_IDENTITY.to_string());
        metadata.insert("upload-timestamp".to_string(), upload_timestamp.clone());

        let receipt = self
            .store
            .put_object(
                &self.config.build_bucket,
                &file_name,
                payload.to_vec(),
                &content_type,
                metadata,
            )
            .await
            .map_err(|e| PublishError::Upload(e.to_string()))?;

        Ok(PublishSuccess {
            message: "Build processed successfully".to_string(),
            commit,
            file_name,
            file_size,
            storage_location: receipt.location,
            timestamp: iso_timestamp(),
        })
    }
}
