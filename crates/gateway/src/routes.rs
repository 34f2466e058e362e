//! Gateway routes and handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode, Uri,
    },
    middleware as axum_middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use buildrelay_common::{percent_decode, Error};
use serde_json::json;
use tokio_util::io::ReaderStream;

use crate::{middleware::require_bearer, paths::resolve_within_base, GatewayConfig};

/// Build the gateway router.
pub fn router(config: Arc<GatewayConfig>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/files/", get(missing_filename))
        .route("/files/{*path}", get(serve_file))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(axum_middleware::from_fn_with_state(
            config.clone(),
            require_bearer,
        ))
        .with_state(config)
}

async fn health(State(config): State<Arc<GatewayConfig>>) -> Response {
    let body = Json(json!({
        "status": "ok",
        "baseDir": config.base_dir,
    }));

    ([(CACHE_CONTROL, "no-store")], body).into_response()
}

async fn missing_filename() -> Error {
    Error::Validation("filename is required".to_string())
}

async fn not_found() -> Error {
    Error::NotFound("no such route".to_string())
}

/// Stream one file from the sandboxed base directory.
///
/// The raw (still percent-encoded) path remainder is taken from the URI so
/// that decoding is strict and under our control: a malformed sequence is a
/// 400, never silently passed through.
async fn serve_file(
    State(config): State<Arc<GatewayConfig>>,
    uri: Uri,
) -> Result<Response, Error> {
    let raw = uri.path().strip_prefix("/files/").unwrap_or_default();
    let requested =
        percent_decode(raw).map_err(|e| Error::Validation(e.to_string()))?;

    if requested.is_empty() {
        return Err(Error::Validation("filename is required".to_string()));
    }

    let resolved = resolve_within_base(&config.base_dir, &requested)?;

    let file = tokio::fs::File::open(&resolved).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(e.to_string())
        } else {
            Error::Internal(e.to_string())
        }
    })?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| Error::Internal(e.to_string()))?;
    if metadata.is_dir() {
        return Err(Error::NotFound(format!(
            "{} is a directory",
            requested
        )));
    }

    let filename = resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| requested.clone());

    tracing::info!(path = %resolved.display(), size = metadata.len(), "Serving file");

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(metadata.len()));
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .map_err(|e| Error::Internal(e.to_string()))?,
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    // Stream rather than buffer: a slow client backpressures the read, and
    // a mid-stream failure aborts the connection after headers are sent.
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((StatusCode::OK, headers, body).into_response())
}
