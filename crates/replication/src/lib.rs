//! Replication entry points
//!
//! Two ways into the same multi-destination copy workflow:
//! - [`ReplicationTrigger`] reacts to a store-change notification
//! - [`ReplicationInvoker`] is the directly-callable alternate entry point
//!   for manual retries and out-of-band requests
//!
//! Both are short-lived, stateless, single-invocation units: one logical
//! request in, one structured result out, no retained state and no local
//! retries.

pub mod invoker;
pub mod trigger;

use std::env;

use buildrelay_common::Error;

pub use invoker::{DestinationBuckets, InvokeOutcome, InvokeRequest, ReplicationInvoker};
pub use trigger::{ReplicationTrigger, TriggerOutcome};

/// Replication configuration, read once at process start.
#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    /// Fixed destination set; every triggered replication fans out to all
    /// of these regional buckets
    pub destination_buckets: Vec<String>,

    /// Workflow identifier; the trigger requires it, the invoker falls
    /// back to [`buildrelay_workflow::DEFAULT_STATE_MACHINE_ARN`]
    pub state_machine_arn: Option<String>,
}

impl ReplicationConfig {
    /// Load replication configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let raw = env::var("DESTINATION_BUCKETS")
            .unwrap_or_else(|_| "region-a-builds,region-b-builds".to_string());
        let destination_buckets: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if destination_buckets.is_empty() {
            return Err(Error::Configuration(
                "DESTINATION_BUCKETS must name at least one bucket".to_string(),
            ));
        }

        let state_machine_arn = env::var("STATE_MACHINE_ARN").ok().filter(|v| !v.is_empty());

        Ok(Self {
            destination_buckets,
            state_machine_arn,
        })
    }
}
