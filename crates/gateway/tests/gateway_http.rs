//! Gateway HTTP integration tests (GW-01 through GW-15)

use std::fs;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use buildrelay_gateway::{router, GatewayConfig};

struct TestGateway {
    _dir: tempfile::TempDir,
    base_dir: std::path::PathBuf,
    router: Router,
}

fn gateway_with_token(token: Option<&str>) -> TestGateway {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("abc123"), b"artifact payload bytes").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested/build.zip"), b"nested").unwrap();

    let config =
        GatewayConfig::new(dir.path(), 3000, token.map(str::to_string)).unwrap();
    let base_dir = config.base_dir.clone();
    let router = router(Arc::new(config));

    TestGateway {
        _dir: dir,
        base_dir,
        router,
    }
}

fn gateway() -> TestGateway {
    gateway_with_token(None)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::http::Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

// GW-01: health reports ok and the configured base directory
#[tokio::test]
async fn test_health() {
    let gw = gateway();
    let resp = gw.router.clone().oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "no-store"
    );

    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["baseDir"], gw.base_dir.to_str().unwrap());
}

// GW-02: an existing file is served byte-identical with exact headers
#[tokio::test]
async fn test_serve_file() {
    let gw = gateway();
    let resp = gw.router.clone().oneshot(get("/files/abc123")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/octet-stream"
    );
    assert_eq!(
        resp.headers().get("content-length").unwrap(),
        &format!("{}", b"artifact payload bytes".len())
    );
    assert_eq!(
        resp.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"abc123\""
    );
    assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");

    assert_eq!(body_bytes(resp).await, b"artifact payload bytes");
}

// GW-03: nested paths under the base directory are served
#[tokio::test]
async fn test_serve_nested_file() {
    let gw = gateway();
    let resp = gw
        .router
        .clone()
        .oneshot(get("/files/nested/build.zip"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"build.zip\""
    );
    assert_eq!(body_bytes(resp).await, b"nested");
}

// GW-04: missing file is a 404
#[tokio::test]
async fn test_missing_file() {
    let gw = gateway();
    let resp = gw
        .router
        .clone()
        .oneshot(get("/files/missing.zip"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// GW-05: parent-directory traversal never reaches outside the base
#[tokio::test]
async fn test_traversal_plain() {
    let gw = gateway();
    let resp = gw
        .router
        .clone()
        .oneshot(get("/files/../../etc/passwd"))
        .await
        .unwrap();
    // stripped ".." confines the request to the sandbox; nothing leaks
    assert!(
        resp.status() == StatusCode::FORBIDDEN || resp.status() == StatusCode::NOT_FOUND,
        "unexpected status {}",
        resp.status()
    );
    let body = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(!body.contains("root:"));
}

// GW-06: percent-encoded traversal is equally confined
#[tokio::test]
async fn test_traversal_encoded() {
    let gw = gateway();
    let resp = gw
        .router
        .clone()
        .oneshot(get("/files/%2e%2e%2f%2e%2e%2fetc%2fpasswd"))
        .await
        .unwrap();
    assert!(
        resp.status() == StatusCode::FORBIDDEN || resp.status() == StatusCode::NOT_FOUND,
        "unexpected status {}",
        resp.status()
    );
}

// GW-07: absolute request paths stay inside the sandbox
#[tokio::test]
async fn test_absolute_path() {
    let gw = gateway();
    let resp = gw
        .router
        .clone()
        .oneshot(get("/files/%2fetc%2fpasswd"))
        .await
        .unwrap();
    assert!(
        resp.status() == StatusCode::FORBIDDEN || resp.status() == StatusCode::NOT_FOUND,
        "unexpected status {}",
        resp.status()
    );
}

// GW-08: a symlink pointing outside the base directory is forbidden
#[cfg(unix)]
#[tokio::test]
async fn test_symlink_escape() {
    let outside = tempfile::tempdir().unwrap();
    fs::write(outside.path().join("secret"), b"leak").unwrap();

    let dir = tempfile::tempdir().unwrap();
    std::os::unix::fs::symlink(outside.path().join("secret"), dir.path().join("link")).unwrap();

    let config = GatewayConfig::new(dir.path(), 3000, None).unwrap();
    let app = router(Arc::new(config));

    let resp = app.oneshot(get("/files/link")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// GW-09: malformed percent sequences are rejected with 400
#[tokio::test]
async fn test_malformed_percent() {
    let gw = gateway();
    for uri in ["/files/%zzabc", "/files/abc%2"] {
        let resp = gw.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri {uri}");
    }
}

// GW-10: an empty filename is rejected with 400
#[tokio::test]
async fn test_empty_filename() {
    let gw = gateway();
    let resp = gw.router.clone().oneshot(get("/files/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = gw.router.clone().oneshot(get("/files/%2e")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// GW-11: unknown routes and non-GET methods are 404
#[tokio::test]
async fn test_unknown_routes() {
    let gw = gateway();
    let resp = gw.router.clone().oneshot(get("/other")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = gw
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/files/abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// GW-12: with a token configured, unauthenticated requests get 401
// before any path resolution (no 403/404 existence leak)
#[tokio::test]
async fn test_auth_applies_before_resolution() {
    let gw = gateway_with_token(Some("sekrit"));

    for uri in ["/files/abc123", "/files/missing.zip", "/files/../../etc/passwd", "/health"] {
        let resp = gw.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "uri {uri}");
    }
}

// GW-13: the exact bearer token is accepted
#[tokio::test]
async fn test_auth_accepts_token() {
    let gw = gateway_with_token(Some("sekrit"));

    let resp = gw
        .router
        .clone()
        .oneshot(get_authed("/files/abc123", "sekrit"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, b"artifact payload bytes");
}

// GW-14: a wrong token is 401, not 403/404
#[tokio::test]
async fn test_auth_rejects_wrong_token() {
    let gw = gateway_with_token(Some("sekrit"));

    let resp = gw
        .router
        .clone()
        .oneshot(get_authed("/files/abc123", "wrong"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// GW-15: requesting a directory is a 404, not a stream
#[tokio::test]
async fn test_directory_is_not_served() {
    let gw = gateway();
    let resp = gw.router.clone().oneshot(get("/files/nested")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
