//! Corner Cafe Storefront - customer ordering service.
//!
//! Serves the menu and accepts orders over a JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Remote store over PostgREST for menu, orders and order items
//! - Menu fallback: remote store, then cached snapshot, then bundled catalog
//! - Mock orders with a local queue number when the backend is not ready

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use corner_cafe_storefront::cache::{FileMenuCache, MemoryMenuCache, MenuCache};
use corner_cafe_storefront::config::CafeConfig;
use corner_cafe_storefront::remote::{RemoteStore, RestStore, UnconfiguredStore};
use corner_cafe_storefront::routes;
use corner_cafe_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CafeConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Build the remote store, or the offline stand-in when no usable endpoint
/// is configured.
fn remote_store(config: &CafeConfig) -> Arc<dyn RemoteStore> {
    if !config.remote.is_configured() {
        tracing::warn!("Remote store not configured, serving bundled menu and mock orders");
        return Arc::new(UnconfiguredStore);
    }

    match RestStore::new(&config.remote) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(error = %e, "Invalid remote store configuration");
            Arc::new(UnconfiguredStore)
        }
    }
}

fn menu_cache(config: &CafeConfig) -> Arc<dyn MenuCache> {
    match &config.menu_cache_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using file menu cache");
            Arc::new(FileMenuCache::new(path))
        }
        None => Arc::new(MemoryMenuCache::new()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (needed for Sentry init)
    let config = CafeConfig::from_env()?;

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "corner_cafe_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let store = remote_store(&config);
    let cache = menu_cache(&config);
    let addr = config.socket_addr();
    let state = AppState::new(config, store, cache);

    let app = routes::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("storefront listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
