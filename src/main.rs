//! Catalog Cache - read-through response cache for a product catalog API
//!
//! Runs a local HTTP gateway in front of the catalog API and warms the cache
//! in the background at startup.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_cache::api::{create_router, AppState};
use catalog_cache::config::Config;
use catalog_cache::tasks::{spawn_warmup_task, WarmupOptions};

/// Main entry point for the catalog gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the catalog client, cache and optional offline store
/// 4. Schedule the background warmup pass
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Catalog Cache gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api={}, cache_duration={}ms, max_cache_size={}, page_size={}, port={}",
        config.api_base_url,
        config.cache_duration_ms,
        config.max_cache_size,
        config.page_size,
        config.server_port
    );

    let state = AppState::from_config(&config).context("failed to initialise catalog client")?;
    info!("Catalog client initialized");

    let warmup_handle = if config.warmup_enabled {
        let handle = spawn_warmup_task(
            state.client.clone(),
            WarmupOptions::from_config(&config),
            config.warmup_delay(),
        );
        info!("Cache warmup scheduled in {}ms", config.warmup_delay_ms);
        Some(handle)
    } else {
        info!("Cache warmup disabled");
        None
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(warmup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts a warmup pass that is still running.
async fn shutdown_signal(warmup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = warmup_handle {
        if !handle.is_finished() {
            handle.abort();
            warn!("Cache warmup aborted");
        }
    }
}
