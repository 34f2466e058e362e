//! Replication invoker - AWS Lambda runtime
//!
//! Directly-invoked entry point: starts the copy workflow from explicit
//! source and destination parameters, for manual retries and programmatic
//! requests.

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;

use buildrelay_common::{AwsSettings, InvocationResponse};
use buildrelay_replication::{InvokeRequest, ReplicationConfig, ReplicationInvoker};
use buildrelay_workflow::SfnWorkflowService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    buildrelay_app::init_lambda_tracing();

    info!("Initializing replication invoker");

    let config = ReplicationConfig::from_env()?;
    let workflow = Arc::new(SfnWorkflowService::new(AwsSettings::from_env()).await);
    let invoker = Arc::new(ReplicationInvoker::new(workflow, &config));

    info!("Replication invoker ready");

    run(service_fn(move |event: LambdaEvent<InvokeRequest>| {
        let invoker = invoker.clone();
        async move {
            let outcome = invoker.handle(event.payload).await;
            Ok::<InvocationResponse, Error>(outcome.into_invocation_response())
        }
    }))
    .await
}
