use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lector::api::{create_router, AppState};
use lector::config::Config;
use lector::ocr::{SessionPool, TesseractFactory};

#[derive(Parser)]
#[command(name = "lector")]
#[command(about = "OCR over HTTP: text and bounding boxes from base64 images")]
struct Args {
    /// Bind address, overrides LECTOR_HOST
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides LECTOR_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Number of OCR sessions, overrides OCR_POOL_SIZE
    #[arg(long)]
    pool_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(pool_size) = args.pool_size {
        config.ocr.pool_size = pool_size.max(1);
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lector=info,tower_http=debug".into());
    if config.server.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        "Initializing OCR engine: tesseract (languages={}, sessions={})...",
        config.ocr.languages,
        config.ocr.pool_size
    );
    let factory = Arc::new(TesseractFactory::new(&config.ocr));
    let sessions = SessionPool::from_config(factory, &config.ocr);
    sessions
        .initialize()
        .await
        .map_err(|e| anyhow::anyhow!("OCR engine failed to start: {e}"))?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, sessions.clone());
    let app = create_router(state);

    tracing::info!("Lector starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/health", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Release the sessions even if the server stopped with an error.
    sessions.shutdown().await;
    served?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining OCR requests...");
}
