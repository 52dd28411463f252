//! HTTP server module
//!
//! REST surface over the judgment engine: prediction, price judgment and
//! metadata introspection, plus the static frontend when present.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::{JudgePayload, ListingPayload};
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::engine::JudgmentEngine;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_dir: String,
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7860),
            model_dir: std::env::var("MODEL_DIR").unwrap_or_else(|_| "./model".to_string()),
            static_dir: Some(
                std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),
            ),
        }
    }
}

/// Load the model artifacts and serve until ctrl+c.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let engine = JudgmentEngine::from_artifacts(std::path::Path::new(&config.model_dir))?;
    info!(
        model_dir = %config.model_dir,
        started_at = %start_time.to_rfc3339(),
        "Loaded model artifacts"
    );

    if let Some(ref static_dir) = config.static_dir {
        if !std::path::Path::new(static_dir).exists() {
            warn!(static_dir = %static_dir, "Static directory not found, frontend will be unavailable");
        }
    }

    let state = Arc::new(AppState::new(config.clone(), engine));
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        host = %config.host,
        port = config.port,
        "Aqariy price engine starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening");

    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
