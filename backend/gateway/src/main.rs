//! Registry gateway — entry point.
//!
//! Serves the parameter codec and process id derivation over HTTP and,
//! unless `WATCH_EVENTS=false`, runs a background task that tails registry
//! events from the Soroban RPC and logs them.

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use registry_gateway::config::Config;
use registry_gateway::watcher::{self, WatcherState};
use registry_gateway::api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    let cancel = CancellationToken::new();

    // ─── Background watcher ───────────────────────────────
    let watcher_task = if config.watch_events {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        let state = Arc::new(WatcherState {
            config: config.clone(),
            client,
            cancel: cancel.clone(),
        });
        Some(tokio::spawn(watcher::run(state)))
    } else {
        info!("Event watcher disabled");
        None
    };

    // ─── REST API ─────────────────────────────────────────
    let app = api::router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
            shutdown.cancel();
        })
        .await?;

    if let Some(task) = watcher_task {
        task.await?;
    }

    Ok(())
}
