//! Replication trigger
//!
//! Consumes a "new object created" store notification, derives a
//! replication job against the fixed destination set, and starts the copy
//! workflow. The workflow identifier is required configuration here: a
//! missing identifier fails the invocation before any start attempt.

use std::sync::Arc;

use buildrelay_common::{DecodeError, InvocationResponse};
use buildrelay_storage::StoreNotification;
use buildrelay_workflow::{ReplicationJob, WorkflowError, WorkflowService};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::ReplicationConfig;

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("notification contains no records")]
    EmptyNotification,

    #[error("failed to decode object key: {0}")]
    Decode(#[from] DecodeError),

    #[error("STATE_MACHINE_ARN is not configured")]
    MissingStateMachineArn,

    #[error(transparent)]
    Start(#[from] WorkflowError),
}

/// Success shape; field names are the result wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSuccess {
    pub message: String,
    pub execution_arn: String,
    pub start_date: String,
    pub source_bucket: String,
    pub source_key: String,
    pub destination_buckets: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerFailure {
    pub message: String,
    pub error: String,
}

/// Tagged trigger result; callers pattern-match exhaustively.
#[derive(Debug, Clone)]
pub enum TriggerOutcome {
    Success(TriggerSuccess),
    Failure(TriggerFailure),
}

impl TriggerOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            TriggerOutcome::Success(_) => 200,
            TriggerOutcome::Failure(_) => 500,
        }
    }

    pub fn into_invocation_response(self) -> InvocationResponse {
        match self {
            TriggerOutcome::Success(success) => InvocationResponse::ok(&success),
            TriggerOutcome::Failure(failure) => InvocationResponse::internal_error(&failure),
        }
    }
}

/// The replication trigger component.
pub struct ReplicationTrigger {
    workflow: Arc<dyn WorkflowService>,
    config: ReplicationConfig,
}

impl ReplicationTrigger {
    pub fn new(workflow: Arc<dyn WorkflowService>, config: ReplicationConfig) -> Self {
        Self { workflow, config }
    }

    /// Handle one store notification. Never returns an error past this
    /// boundary.
    pub async fn handle(&self, notification: StoreNotification) -> TriggerOutcome {
        match self.try_handle(notification).await {
            Ok(success) => {
                tracing::info!(
                    execution_arn = %success.execution_arn,
                    source_key = %success.source_key,
                    "File distribution workflow started successfully"
                );
                TriggerOutcome::Success(success)
            }
            Err(error) => {
                tracing::error!(error = %error, "Error processing store notification");
                TriggerOutcome::Failure(TriggerFailure {
                    message: "Error processing store notification".to_string(),
                    error: error.to_string(),
                })
            }
        }
    }

    async fn try_handle(
        &self,
        notification: StoreNotification,
    ) -> Result<TriggerSuccess, TriggerError> {
        let record = notification
            .records
            .into_iter()
            .next()
            .ok_or(TriggerError::EmptyNotification)?;

        let source_bucket = record.s3.bucket.name;
        let source_key = record.s3.object.decoded_key()?;
        tracing::info!(bucket = %source_bucket, key = %source_key, "Processing store notification");

        // Resolve configuration before building the job: a missing
        // identifier must fail without a start attempt.
        let state_machine_arn = self
            .config
            .state_machine_arn
            .clone()
            .ok_or(TriggerError::MissingStateMachineArn)?;

        let job = ReplicationJob {
            source_bucket,
            source_key,
            destination_buckets: self.config.destination_buckets.clone(),
        };

        let name = execution_name(&job.source_key);
        let execution = self
            .workflow
            .start_execution(&state_machine_arn, &name, &job)
            .await?;

        Ok(TriggerSuccess {
            message: "File distribution workflow started successfully".to_string(),
            execution_arn: execution.execution_arn,
            start_date: execution.start_date.to_rfc3339(),
            source_bucket: job.source_bucket,
            source_key: job.source_key,
            destination_buckets: job.destination_buckets,
        })
    }
}

/// Unique per invocation, human-traceable: repeated notifications for the
/// same key get distinct names but stay grep-able by the sanitized key.
fn execution_name(key: &str) -> String {
    format!(
        "file-distribution-{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_key(key)
    )
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
