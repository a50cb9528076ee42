//! Clipio Backend
//!
//! REST backend for the Clipio design-asset manager, plus the dashboard
//! view-model shared with the native client: filtering, sorting, pagination,
//! selection and bulk actions over the asset library.

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod errors;
pub mod models;
pub mod tagging;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;
use tagging::TagSuggester;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub suggester: Arc<dyn TagSuggester>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the secret for the auth layer
    let secret = state.config.session_secret.clone();

    // API routes
    let api_routes = Router::new()
        // Assets
        .route("/assets", get(api::list_assets))
        .route("/assets", post(api::create_asset))
        // Collections
        .route("/collections", get(api::list_collections))
        .route("/collections", post(api::create_collection))
        .route("/collections", put(api::update_collection))
        .route("/collections", delete(api::delete_collection))
        // Apply session auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::session_auth_layer(secret.clone(), req, next)
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
