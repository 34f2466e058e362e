//! Mock workflow service implementation
//!
//! Records start-execution calls in memory for test assertions and
//! supports a programmed failure. Thread-safe via `Arc<Mutex<>>`.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::{ReplicationJob, StartedExecution, WorkflowError, WorkflowService};

/// A recorded start-execution call.
#[derive(Debug, Clone)]
pub struct RecordedStart {
    pub state_machine_arn: String,
    pub name: String,
    pub input: ReplicationJob,
}

/// Mock workflow service that records executions for test assertions.
#[derive(Debug, Clone, Default)]
pub struct MockWorkflowService {
    starts: Arc<Mutex<Vec<RecordedStart>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockWorkflowService {
    /// Create a new mock workflow service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Program every subsequent start to fail with the given detail.
    pub fn fail_with(&self, detail: impl Into<String>) {
        *self
            .fail_with
            .lock()
            .expect("fail_with lock poisoned — prior test panicked") = Some(detail.into());
    }

    /// Return all recorded start-execution calls.
    pub fn recorded_starts(&self) -> Vec<RecordedStart> {
        self.starts
            .lock()
            .expect("starts lock poisoned — prior test panicked")
            .clone()
    }
}

#[async_trait::async_trait]
impl WorkflowService for MockWorkflowService {
    async fn start_execution(
        &self,
        state_machine_arn: &str,
        name: &str,
        input: &ReplicationJob,
    ) -> Result<StartedExecution, WorkflowError> {
        if let Some(detail) = self
            .fail_with
            .lock()
            .map_err(|e| WorkflowError::Start(format!("fail_with lock poisoned: {e}")))?
            .clone()
        {
            return Err(WorkflowError::Start(detail));
        }

        tracing::debug!(execution_name = %name, "Mock workflow: recording start");
        self.starts
            .lock()
            .map_err(|e| WorkflowError::Start(format!("starts lock poisoned: {e}")))?
            .push(RecordedStart {
                state_machine_arn: state_machine_arn.to_string(),
                name: name.to_string(),
                input: input.clone(),
            });

        Ok(StartedExecution {
            execution_arn: format!(
                "{}:{}",
                state_machine_arn.replace(":stateMachine:", ":execution:"),
                name
            ),
            start_date: Utc::now(),
        })
    }
}
