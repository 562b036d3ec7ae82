mod app_state;
mod config;
mod models;
mod routes;
mod services;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use app_state::AppState;
use config::AppConfig;
use services::settings_store::MemorySettingsStore;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing s3-upload-bridge");

    // The standalone binary keeps settings in process memory; embedding
    // hosts supply their own SettingsStore implementation.
    let store = Arc::new(MemorySettingsStore::new());
    let state = AppState::new(config.clone(), store);

    // Activate settings before any route is registered; an unreadable
    // settings store aborts startup.
    state
        .resolver
        .refresh()
        .await
        .expect("Failed to fetch storage settings");

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/admin/s3-uploads", get(routes::admin::settings_view))
        .route(
            "/api/admin/s3-uploads/settings",
            post(routes::admin::save_settings),
        )
        .route(
            "/api/admin/s3-uploads/credentials",
            post(routes::admin::save_credentials),
        )
        .route("/api/v1/upload/image", post(routes::upload::upload_image))
        .route("/api/v1/upload/file", post(routes::upload::upload_file))
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(1024 * 1024)); // JSON bodies only; payloads arrive by path or URL

    tracing::info!("Starting s3-upload-bridge on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");

    // Drop the memoized storage handle so stale credentials are not held.
    state.storage.invalidate();
}
