//! Anti-GIF bot HTTP server
//!
//! Receives Spark webhooks and removes messages carrying animated GIFs.

use std::{path::PathBuf, sync::Arc, time::Duration};

use application::ModerationService;
use infrastructure::{AppConfig, GifClassifier, SparkAdapter, init_logging};
use presentation_http::{PidFile, remove_pid_file, routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("🤖 antigiphy v{} starting...", env!("CARGO_PKG_VERSION"));

    let client_config = config.spark_client_config()?;
    info!(
        host = %config.server.host,
        port = %config.server.port,
        base_url = %client_config.base_url,
        signed_webhooks = config.spark.webhook_secret.is_some(),
        "Configuration loaded"
    );

    // Initialize adapters and services
    let spark = Arc::new(
        SparkAdapter::from_config(&client_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Spark client: {e}"))?,
    );
    let moderation = ModerationService::new(
        spark.clone(),
        spark,
        Arc::new(GifClassifier::new()),
        config.moderation.clone(),
    );

    let pid_file = PidFile::create(&config.server.pid_file)?;
    let pid_path = pid_file.path().to_path_buf();

    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let max_body_bytes = config.server.max_body_bytes;

    let state = AppState {
        moderation: Arc::new(moderation),
        config: Arc::new(config),
    };

    // Build router (first added layer is innermost)
    let app = routes::create_router(state)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout, pid_path))
        .await?;

    drop(pid_file);

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration, pid_path: PathBuf) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting up to {:?} for connections to close...", timeout);

    // Force exit if draining outlives the timeout
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        tracing::warn!("Shutdown timeout elapsed, exiting");
        // process::exit skips destructors
        if let Err(e) = remove_pid_file(&pid_path) {
            tracing::warn!(path = %pid_path.display(), error = %e, "Failed to remove PID file");
        }
        std::process::exit(1);
    });
}
