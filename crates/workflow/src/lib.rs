//! buildrelay workflow orchestrator boundary
//!
//! The multi-destination copy itself runs inside an external state-machine
//! execution service; the pipeline only starts executions and records the
//! returned handle. This crate provides:
//! - The [`WorkflowService`] trait the trigger and invoker start through
//! - An AWS Step Functions implementation
//! - A recording mock for test assertions

pub mod mock;
pub mod sfn;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use mock::MockWorkflowService;
pub use sfn::SfnWorkflowService;

/// Fallback state-machine identifier for the directly-callable invoker,
/// which runs in controlled/manual contexts where a default is acceptable.
pub const DEFAULT_STATE_MACHINE_ARN: &str =
    "arn:aws:states:us-east-1:000000000000:stateMachine:file-copy-workflow";

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Workflow configuration error: {0}")]
    Configuration(String),

    #[error("Failed to start workflow execution: {0}")]
    Start(String),
}

/// The replication job submitted as workflow input.
///
/// Serialized field names are the workflow's wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationJob {
    pub source_bucket: String,
    pub source_key: String,
    pub destination_buckets: Vec<String>,
}

/// Opaque handle for a started workflow execution.
#[derive(Debug, Clone)]
pub struct StartedExecution {
    pub execution_arn: String,
    pub start_date: DateTime<Utc>,
}

/// Workflow service trait for different orchestrator backends.
#[async_trait::async_trait]
pub trait WorkflowService: Send + Sync {
    /// Start one execution of the named state machine with the given
    /// caller-unique execution name and job input.
    async fn start_execution(
        &self,
        state_machine_arn: &str,
        name: &str,
        input: &ReplicationJob,
    ) -> Result<StartedExecution, WorkflowError>;
}
