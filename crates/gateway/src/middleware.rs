//! Bearer-token middleware for the gateway
//!
//! When a shared-secret token is configured, every route (including
//! `/health`) requires `Authorization: Bearer <token>` exactly. The check
//! runs before any route dispatch or filesystem access, so unauthenticated
//! callers learn nothing about file existence.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use buildrelay_common::Error;

use crate::GatewayConfig;

pub async fn require_bearer(
    State(config): State<Arc<GatewayConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(token) = &config.token {
        let expected = format!("Bearer {token}");
        let provided = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected.as_str()) {
            return Error::Authentication("missing or invalid bearer token".to_string())
                .into_response();
        }
    }

    next.run(request).await
}
