//! HTTP server initialization and runtime setup.
//!
//! Wires storage backends, classifiers and click sinks into the redirect
//! service and runs the Axum server with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;

use crate::application::services::RedirectService;
use crate::config::{Config, ResolverStrategy};
use crate::domain::click_handler::{ClickHandler, StoreClickHandler};
use crate::domain::repositories::TrackingLinksRepository;
use crate::infrastructure::persistence::{
    MultiTrackingLinksRepository, PgClicksRepository, PgTrackingLinksRepository,
    RacingTrackingLinksRepository, RedisTrackingLinksRepository,
};
use crate::infrastructure::services::{
    MaxMindIpParser, MeteredClickHandler, WootheeUserAgentParser,
};
use crate::metrics;
use crate::routes::app_router;
use crate::state::AppState;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the Prometheus registry
/// - the PostgreSQL pool (tracking links + click store)
/// - the optional Redis tracking-link backend, combined with the database
///   backend through the configured multi-resolver
/// - the GeoIP and User-Agent classifiers
/// - the store click sink, wrapped with per-handler duration metrics
///
/// # Shutdown
///
/// On `SIGTERM` / `Ctrl-C` the server stops accepting connections and waits
/// for in-flight requests; the shutdown token is then cancelled so click
/// sinks and drain tasks wind down promptly.
///
/// # Errors
///
/// Returns an error if the database connection, the GeoIP database or the
/// server bind fails.
pub async fn run(config: Config) -> Result<()> {
    metrics::init_metrics().context("Failed to initialize metrics")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    let pool = Arc::new(pool);

    let mut backends: Vec<Arc<dyn TrackingLinksRepository>> = Vec::new();

    if let Some(redis_url) = &config.redis_url {
        match connect_redis(redis_url).await {
            Ok(manager) => {
                tracing::info!("Redis tracking link backend enabled");
                backends.push(Arc::new(RedisTrackingLinksRepository::new(manager)));
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Continuing with the database backend only.",
                    e
                );
            }
        }
    }

    backends.push(Arc::new(PgTrackingLinksRepository::new(pool.clone())));

    let tracking_links: Arc<dyn TrackingLinksRepository> = match config.resolver_strategy {
        ResolverStrategy::Sequential => Arc::new(MultiTrackingLinksRepository::new(backends)),
        ResolverStrategy::Concurrent => Arc::new(RacingTrackingLinksRepository::new(backends)),
    };

    let ip_parser = Arc::new(
        MaxMindIpParser::open(&config.geoip_db_path)
            .with_context(|| format!("Failed to open GeoIP database {}", config.geoip_db_path))?,
    );
    let ua_parser = Arc::new(WootheeUserAgentParser::new());

    let clicks_repository = Arc::new(PgClicksRepository::new(pool.clone()));
    let store_handler: Arc<dyn ClickHandler> =
        Arc::new(StoreClickHandler::new(clicks_repository));
    let click_handlers: Vec<Arc<dyn ClickHandler>> =
        vec![Arc::new(MeteredClickHandler::new(store_handler, "store"))];

    let redirect_service = Arc::new(RedirectService::new(
        tracking_links,
        ip_parser,
        ua_parser,
        click_handlers,
        config.max_redirect_depth,
    ));

    let shutdown = CancellationToken::new();
    let state = AppState::new(redirect_service, shutdown.clone());

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // In-flight requests are done; release background click drains.
    shutdown.cancel();
    tracing::info!("HTTP server stopped, shutdown complete");

    Ok(())
}

async fn connect_redis(redis_url: &str) -> Result<ConnectionManager> {
    let client = redis::Client::open(redis_url).context("Invalid Redis URL")?;
    let manager = ConnectionManager::new(client)
        .await
        .context("Failed to connect to Redis")?;

    Ok(manager)
}

/// Resolves on Ctrl-C (all platforms) or SIGTERM (Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
