//! buildrelay process entry points
//!
//! One binary per deployable unit: the gateway HTTP server runs as a
//! long-lived local process, the publisher and replication entry points
//! run on the Lambda runtime. This crate only holds the shared tracing
//! setup; everything else lives in the component crates.

/// Tracing for Lambda entry points (JSON, Lambda adds timestamps).
pub fn init_lambda_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();
}

/// Tracing for local development processes.
pub fn init_local_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .pretty()
        .init();
}
