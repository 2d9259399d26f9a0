//! Statusboard Backend
//!
//! A production-grade REST backend for monthly AI project status reporting,
//! built around reporting-period lifecycle management with SQLite persistence.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod schedule;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Statusboard Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (STATUSBOARD_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Periods
        .route("/periods", get(api::list_periods))
        .route("/periods/current", get(api::get_current_period))
        .route("/periods/next", get(api::get_next_period))
        .route("/periods/create-next", post(api::create_next_period))
        .route("/periods/{id}", get(api::get_period))
        .route("/periods/{id}", put(api::update_period))
        .route("/periods/{id}", delete(api::delete_period))
        .route("/periods/{id}/lock", post(api::lock_period))
        .route("/periods/{id}/projects", get(api::list_period_projects))
        // Projects
        .route("/projects", get(api::list_projects))
        .route("/projects", post(api::create_project))
        .route("/projects/{id}", get(api::get_project))
        .route("/projects/{id}", put(api::update_project))
        .route("/projects/{id}", delete(api::delete_project))
        // Period-scoped project views and field writes
        .route(
            "/projects/{id}/periods/{periodId}",
            get(api::get_project_for_period),
        )
        .route(
            "/projects/{id}/periods/{periodId}/fields/{fieldName}",
            put(api::set_project_field),
        )
        // Next steps
        .route(
            "/projects/{id}/periods/{periodId}/steps",
            get(api::list_next_steps),
        )
        .route(
            "/projects/{id}/periods/{periodId}/steps",
            post(api::create_next_step),
        )
        .route("/steps/{id}", put(api::update_next_step))
        .route("/steps/{id}", delete(api::delete_next_step))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
