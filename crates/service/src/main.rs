//! ZIP+4 Service - USPS address validation for Shopify checkout.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - Shopify checkout session tokens for caller authentication
//! - USPS OAuth + Addresses API v3 for ZIP+4 lookups
//! - No database: every request is independent
//!
//! The USPS consumer key/secret and the Shopify client secret never leave
//! this process and are never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zip4_service::usps::UspsError;
use zip4_service::{AppState, ServiceConfig, router};

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "zip4_service=info,tower_http=debug";

#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to build USPS client: {0}")]
    Usps(#[from] UspsError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServiceConfig::from_env().expect("Failed to load configuration");

    // Sentry must exist before the tracing layer that forwards to it
    let _sentry_guard = init_telemetry(&config);

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "zip4 service stopped");
            ExitCode::FAILURE
        }
    }
}

/// Initialize Sentry (when a DSN is set) and the tracing subscriber.
///
/// Logs are JSON on Fly.io and human-readable text elsewhere. Warnings and
/// errors become Sentry events; info and debug become breadcrumbs.
fn init_telemetry(config: &ServiceConfig) -> Option<sentry::ClientInitGuard> {
    let guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config
                    .sentry_environment
                    .clone()
                    .map(std::borrow::Cow::Owned),
                sample_rate: config.sentry_sample_rate,
                traces_sample_rate: config.sentry_traces_sample_rate,
                attach_stacktrace: true,
                ..Default::default()
            },
        ))
    });

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let on_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = on_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!on_fly).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
            tracing::Level::ERROR | tracing::Level::WARN => EventFilter::Event,
            tracing::Level::INFO | tracing::Level::DEBUG => EventFilter::Breadcrumb,
            _ => EventFilter::Ignore,
        }))
        .init();

    if guard.is_some() {
        tracing::info!("Sentry initialized");
    }
    guard
}

/// Build the app and serve it until a shutdown signal arrives.
async fn serve(config: ServiceConfig) -> Result<(), StartupError> {
    let addr = config.socket_addr();
    let usps_configured = config.usps.credentials().is_some();

    tracing::info!(
        usps_base_url = %config.usps.base_url,
        usps_configured,
        shopify_api_key = %config.shopify.api_key,
        "Starting zip4 service"
    );
    if !usps_configured {
        tracing::warn!("USPS credentials not set; every lookup will report \"USPS API not configured\"");
    }

    let app = router(AppState::new(config)?)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!("zip4 service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

/// Wait for Ctrl+C or SIGTERM (sent by Fly on deploys).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, draining connections");
}
