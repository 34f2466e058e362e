//! Artifact gateway
//!
//! Exposes build artifacts from a sandboxed local directory over HTTP:
//! - `GET /health` — liveness plus the configured base directory
//! - `GET /files/{path}` — streams one artifact, path-traversal safe
//!
//! An optional shared-secret bearer token gates every route. Requests are
//! handled independently; the only shared state is the read-only config.

pub mod middleware;
pub mod paths;
pub mod routes;

use std::env;
use std::path::{Path, PathBuf};

use buildrelay_common::Error;

pub use routes::router;

/// Gateway configuration, read once at process start.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Canonicalized directory all served files must resolve under
    pub base_dir: PathBuf,

    /// Listening port
    pub port: u16,

    /// Optional shared-secret bearer token; when set, every route
    /// requires `Authorization: Bearer <token>` exactly
    pub token: Option<String>,
}

impl GatewayConfig {
    /// Build a config, canonicalizing the base directory.
    pub fn new(
        base_dir: impl AsRef<Path>,
        port: u16,
        token: Option<String>,
    ) -> Result<Self, Error> {
        let base_dir = base_dir.as_ref().canonicalize().map_err(|e| {
            Error::Configuration(format!(
                "base directory {}: {e}",
                base_dir.as_ref().display()
            ))
        })?;

        Ok(Self {
            base_dir,
            port,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Load gateway configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let base_dir = match env::var("GATEWAY_BASE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir()
                .map_err(|e| Error::Configuration(format!("current directory: {e}")))?,
        };

        let port = match env::var("GATEWAY_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Configuration(format!("invalid GATEWAY_PORT: {raw}")))?,
            Err(_) => 3000,
        };

        let token = env::var("GATEWAY_TOKEN").ok();

        Self::new(base_dir, port, token)
    }
}
