use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemhunter_core::{
    load_config, validate_config, InMemorySearchCache, SearchCache, VideoPlatform, YouTubeClient,
};
use gemhunter_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("GEMHUNTER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Hunt defaults: {} keywords, {} days, min {} views, max {} subscribers",
        config.hunt.keywords.len(),
        config.hunt.lookback_days,
        config.hunt.min_views,
        config.hunt.max_subscribers
    );
    info!("Scoring policy: {:?}", config.scoring.smoothing_policy());

    let platform: Arc<dyn VideoPlatform> = Arc::new(
        YouTubeClient::new(&config.youtube).context("Failed to create YouTube client")?,
    );
    info!("Using video platform: {}", platform.name());

    let cache: Option<Arc<dyn SearchCache>> = if config.cache.enabled {
        info!(
            "Search cache enabled (ttl {}s, max {} entries)",
            config.cache.ttl_secs, config.cache.max_entries
        );
        Some(Arc::new(InMemorySearchCache::from_config(&config.cache)))
    } else {
        info!("Search cache disabled");
        None
    };

    let (state, forwarder) = AppState::with_event_forwarding(config.clone(), platform, cache);
    let state = Arc::new(state);

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    forwarder.abort();

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
}
