//! Build publisher - AWS Lambda runtime
//!
//! HTTP-invoked entry point: fetches the named build from the artifact
//! gateway and uploads it to the global build bucket.

use std::sync::Arc;

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use tracing::info;

use buildrelay_common::{AwsSettings, InvocationResponse};
use buildrelay_publisher::{BuildPublisher, PublishOutcome, PublishRequest, PublisherConfig};
use buildrelay_storage::S3ObjectStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    buildrelay_app::init_lambda_tracing();

    info!("Initializing build publisher");

    let config = PublisherConfig::from_env();
    let store = Arc::new(S3ObjectStore::new(AwsSettings::from_env()).await);
    let publisher = Arc::new(BuildPublisher::new(store, config));

    info!("Build publisher ready");

    run(service_fn(move |event: Request| {
        let publisher = publisher.clone();
        async move { handle(&publisher, event).await }
    }))
    .await
}

async fn handle(publisher: &BuildPublisher, event: Request) -> Result<Response<Body>, Error> {
    let outcome = match PublishRequest::from_body(event.body()) {
        Ok(request) => publisher.publish(request).await,
        Err(error) => PublishOutcome::from_error(error),
    };

    respond(outcome.into_invocation_response())
}

fn respond(response: InvocationResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(response.status_code)
        .header("content-type", "application/json")
        .body(Body::Text(response.body))?)
}
