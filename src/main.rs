//! moderation-console server entry point.
//!
//! Restores local state, refreshes the working copy and starts the Axum
//! HTTP server.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use moderation_console::api;
use moderation_console::app_state::AppState;
use moderation_console::config::{ConsoleConfig, LogFormat};
use moderation_console::persistence::LocalStore;
use moderation_console::service::{ModerationService, RefreshOutcome};
use moderation_console::upstream::{HttpModerationApi, ModerationApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ConsoleConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(
        addr = %config.listen_addr,
        upstream = %config.moderation_api_url,
        "starting moderation-console"
    );

    // Build upstream client and local state
    let api: Arc<dyn ModerationApi> = Arc::new(HttpModerationApi::new(
        config.moderation_api_url.clone(),
        config.upstream_timeout,
    )?);
    let local = if config.persistence_enabled {
        LocalStore::new(&config.state_dir)
    } else {
        LocalStore::disabled()
    };

    // Build service layer
    let service = ModerationService::new(
        api,
        local,
        config.page_size,
        config.upstream_page_limit,
    );
    let restored = service.restore().await;
    match service.refresh_listings().await {
        Ok(RefreshOutcome::Applied(count)) => tracing::info!(count, "initial refresh applied"),
        Ok(RefreshOutcome::Discarded) => {}
        Err(err) => tracing::warn!(
            error = %err,
            restored,
            "initial refresh failed, serving restored working copy"
        ),
    }

    // Build application state
    let app_state = AppState {
        service: Arc::new(service),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
