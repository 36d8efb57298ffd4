//! Service entry point: configuration, tracing, pool, router, shutdown.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use outbox_broadcast::adapters::http::{messages_router, MessagesAppState};
use outbox_broadcast::adapters::postgres::PgUnitOfWorkFactory;
use outbox_broadcast::application::BroadcastHandler;
use outbox_broadcast::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    let environments = config.outbox.environments()?;
    tracing::info!(
        environments = ?environments.iter().map(|e| e.as_str()).collect::<Vec<_>>(),
        "configured broadcast environments"
    );

    let shutdown = CancellationToken::new();
    let factory = PgUnitOfWorkFactory::new(pool, environments)?;
    let state = MessagesAppState {
        broadcast_handler: Arc::new(BroadcastHandler::new(Arc::new(factory))),
        shutdown: shutdown.clone(),
    };

    // Every log line for one request carries the generated request id, so
    // the per-environment write entries of a broadcast are correlatable.
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown");
        tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            uri = %request.uri()
        )
    });

    // Layer order (outermost last): set the request id before tracing opens
    // the span, propagate it onto the response closest to the handler.
    let app = messages_router()
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace_layer)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

/// Waits for ctrl-c, then cancels the shutdown token so in-flight
/// broadcasts observe the shutdown at their next checkpoint.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {e}");
    }
    tracing::info!("shutdown requested, cancelling in-flight broadcasts");
    shutdown.cancel();
}
