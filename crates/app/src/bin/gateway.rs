//! Artifact gateway - local HTTP server
//!
//! Serves build artifacts from the configured base directory, typically
//! on the host machine next to the build output.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use buildrelay_gateway::{router, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    buildrelay_app::init_local_tracing();

    info!("Starting artifact gateway");

    let config = GatewayConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    info!(
        base_dir = %config.base_dir.display(),
        auth = config.token.is_some(),
        "Configuration loaded successfully"
    );

    let port = config.port;
    let app = router(Arc::new(config)).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Gateway listening on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
