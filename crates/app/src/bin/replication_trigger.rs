//! Replication trigger - AWS Lambda runtime
//!
//! Notification-invoked entry point: reacts to new objects in the global
//! build bucket by starting the multi-destination copy workflow.

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;

use buildrelay_common::{AwsSettings, InvocationResponse};
use buildrelay_replication::{ReplicationConfig, ReplicationTrigger};
use buildrelay_storage::StoreNotification;
use buildrelay_workflow::SfnWorkflowService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    buildrelay_app::init_lambda_tracing();

    info!("Initializing replication trigger");

    let config = ReplicationConfig::from_env()?;
    let workflow = Arc::new(SfnWorkflowService::new(AwsSettings::from_env()).await);
    let trigger = Arc::new(ReplicationTrigger::new(workflow, config));

    info!("Replication trigger ready");

    run(service_fn(move |event: LambdaEvent<StoreNotification>| {
        let trigger = trigger.clone();
        async move {
            let outcome = trigger.handle(event.payload).await;
            Ok::<InvocationResponse, Error>(outcome.into_invocation_response())
        }
    }))
    .await
}
