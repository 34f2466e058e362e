//! Replication invoker
//!
//! Directly-callable entry point for starting the copy workflow from
//! explicit parameters, used for manual retries and programmatic requests
//! that already know source and destinations. Unlike the trigger, a
//! default workflow identifier is acceptable on this path.

use std::sync::Arc;

use buildrelay_common::InvocationResponse;
use buildrelay_workflow::{
    ReplicationJob, WorkflowError, WorkflowService, DEFAULT_STATE_MACHINE_ARN,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ReplicationConfig;

/// Destination buckets accept a single value or an ordered list; single
/// values normalize to a one-element list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DestinationBuckets {
    One(String),
    Many(Vec<String>),
}

impl DestinationBuckets {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            DestinationBuckets::One(bucket) => vec![bucket],
            DestinationBuckets::Many(buckets) => buckets,
        }
    }
}

/// Invocation payload for one replication request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    pub source_bucket: Option<String>,
    pub source_key: Option<String>,
    pub destination_buckets: Option<DestinationBuckets>,
}

#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("missing required parameter: {0}")]
    MissingField(&'static str),

    #[error("destinationBuckets must name at least one bucket")]
    EmptyDestinations,

    #[error(transparent)]
    Start(#[from] WorkflowError),
}

/// Success shape; field names are the result wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeSuccess {
    pub message: String,
    pub execution_arn: String,
    pub start_date: String,
    pub input: ReplicationJob,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvokeFailure {
    pub message: String,
    pub error: String,
}

/// Tagged invoke result; callers pattern-match exhaustively.
#[derive(Debug, Clone)]
pub enum InvokeOutcome {
    Success(InvokeSuccess),
    Failure(InvokeFailure),
}

impl InvokeOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            InvokeOutcome::Success(_) => 200,
            InvokeOutcome::Failure(_) => 500,
        }
    }

    pub fn into_invocation_response(self) -> InvocationResponse {
        match self {
            InvokeOutcome::Success(success) => InvocationResponse::ok(&success),
            InvokeOutcome::Failure(failure) => InvocationResponse::internal_error(&failure),
        }
    }
}

/// The replication invoker component.
pub struct ReplicationInvoker {
    workflow: Arc<dyn WorkflowService>,
    state_machine_arn: String,
}

impl ReplicationInvoker {
    /// The workflow identifier defaults when unset; this path runs in
    /// controlled/manual contexts.
    pub fn new(workflow: Arc<dyn WorkflowService>, config: &ReplicationConfig) -> Self {
        Self {
            workflow,
            state_machine_arn: config
                .state_machine_arn
                .clone()
                .unwrap_or_else(|| DEFAULT_STATE_MACHINE_ARN.to_string()),
        }
    }

    /// Handle one replication request. Never returns an error past this
    /// boundary.
    pub async fn handle(&self, request: InvokeRequest) -> InvokeOutcome {
        match self.try_handle(request).await {
            Ok(success) => {
                tracing::info!(
                    execution_arn = %success.execution_arn,
                    "Replication workflow started successfully"
                );
                InvokeOutcome::Success(success)
            }
            Err(error) => {
                tracing::error!(error = %error, "Error starting replication workflow");
                InvokeOutcome::Failure(InvokeFailure {
                    message: "Error starting replication workflow".to_string(),
                    error: error.to_string(),
                })
            }
        }
    }

    async fn try_handle(&self, request: InvokeRequest) -> Result<InvokeSuccess, InvokeError> {
        let source_bucket = request
            .source_bucket
            .filter(|v| !v.is_empty())
            .ok_or(InvokeError::MissingField("sourceBucket"))?;
        let source_key = request
            .source_key
            .filter(|v| !v.is_empty())
            .ok_or(InvokeError::MissingField("sourceKey"))?;
        let destination_buckets = request
            .destination_buckets
            .ok_or(InvokeError::MissingField("destinationBuckets"))?
            .into_vec();

        if destination_buckets.is_empty() {
            return Err(InvokeError::EmptyDestinations);
        }

        let job = ReplicationJob {
            source_bucket,
            source_key,
            destination_buckets,
        };

        let name = format!("file-copy-{}", Utc::now().timestamp_millis());
        let execution = self
            .workflow
            .start_execution(&self.state_machine_arn, &name, &job)
            .await?;

        Ok(InvokeSuccess {
            message: "Replication workflow started successfully".to_string(),
            execution_arn: execution.execution_arn,
            start_date: execution.start_date.to_rfc3339(),
            input: job,
        })
    }
}
