//! AWS Step Functions workflow service implementation

use aws_sdk_sfn::Client as SfnClient;
use chrono::{DateTime, Utc};
use buildrelay_common::{load_sdk_config, AwsSettings};

use crate::{ReplicationJob, StartedExecution, WorkflowError, WorkflowService};

/// AWS Step Functions implementation of [`WorkflowService`].
pub struct SfnWorkflowService {
    client: SfnClient,
}

impl SfnWorkflowService {
    /// Create a new Step Functions service from the shared AWS settings.
    pub async fn new(settings: AwsSettings) -> Self {
        let sdk_config = load_sdk_config(&settings).await;
        Self {
            client: SfnClient::new(&sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl WorkflowService for SfnWorkflowService {
    async fn start_execution(
        &self,
        state_machine_arn: &str,
        name: &str,
        input: &ReplicationJob,
    ) -> Result<StartedExecution, WorkflowError> {
        let input_json = serde_json::to_string(input)
            .map_err(|e| WorkflowError::Start(format!("failed to serialize input: {e}")))?;

        tracing::info!(
            state_machine_arn = %state_machine_arn,
            execution_name = %name,
            "Starting workflow execution"
        );

        let output = self
            .client
            .start_execution()
            .state_machine_arn(state_machine_arn)
            .name(name)
            .input(input_json)
            .send()
            .await
            .map_err(|e| WorkflowError::Start(e.to_string()))?;

        let start_date = output.start_date();
        let start_date: DateTime<Utc> =
            DateTime::from_timestamp(start_date.secs(), start_date.subsec_nanos())
                .unwrap_or_else(Utc::now);

        let execution = StartedExecution {
            execution_arn: output.execution_arn().to_string(),
            start_date,
        };

        tracing::info!(execution_arn = %execution.execution_arn, "Workflow execution started");

        Ok(execution)
    }
}
