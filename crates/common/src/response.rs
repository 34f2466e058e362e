//! Invocation response envelope shared by the Lambda entry points
//!
//! Every entry point resolves to `{statusCode, body}` where `body` is a
//! serialized JSON document: 200 with the success shape, 500 with the
//! failure shape. Business failures never escape as faults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    /// Build a 200 response from a serializable success body.
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::with_status(200, body)
    }

    /// Build a 500 response from a serializable failure body.
    pub fn internal_error<T: Serialize>(body: &T) -> Self {
        Self::with_status(500, body)
    }

    fn with_status<T: Serialize>(status_code: u16, body: &T) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize response body");
            format!(r#"{{"message":"failed to serialize response body","error":"{e}"}}"#)
        });
        Self { status_code, body }
    }
}
