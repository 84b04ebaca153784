//! Partner shop directory server.
//!
//! Serves the public list at `/shops` and, when `ADMIN_ENABLED` is set, the
//! admin list with delete affordances at `/admin/shops`. Pages are rendered
//! with askama and progressively enhanced with HTMX; shop data comes from the
//! remote data service at `DATA_SERVICE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;

use partner_shops_web::config::WebConfig;
use partner_shops_web::routes;
use partner_shops_web::state::AppState;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "partner_shops_web=info,tower_http=debug";
const STATIC_DIR: &str = "crates/web/static";

/// Start Sentry when a DSN is configured. The guard flushes events on drop.
fn init_sentry(config: &WebConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Cow::Owned),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    };

    Some(sentry::init((dsn, options)))
}

/// Warnings and errors become Sentry events; request logs from `tower_http`
/// stay out of the breadcrumb trail.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    if metadata.target().starts_with("tower_http") {
        return EventFilter::Ignore;
    }

    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => EventFilter::Breadcrumb,
        tracing::Level::TRACE => EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = WebConfig::from_env().expect("invalid configuration");

    // Sentry has to exist before the tracing layer that feeds it
    let sentry_guard = init_sentry(&config);
    init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry enabled");
    }

    let addr = config.socket_addr();
    let admin_enabled = config.admin_enabled;
    let state = AppState::new(config).expect("failed to build the data service client");
    tracing::info!(
        data_service = %state.shops().base_url(),
        admin_enabled,
        "Shop data service client ready"
    );

    let app = routes::app(state)
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("cannot listen on {addr}: {e}"));
    tracing::info!(%addr, "Partner shop directory listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server stopped with an error");
    }
}

/// Resolve on Ctrl+C, or on SIGTERM where available.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;

    tracing::info!("Shutdown requested, draining connections");
}
