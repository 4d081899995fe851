//! Router assembly.
//!
//! One flat router; protected routes opt in to authentication by taking
//! the [`crate::auth::Bearer`] extractor. CORS is wide open, matching the
//! allow-all policy the service has always shipped with.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::AppState;

/// Builds the application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/auth/start", post(handlers::start_session))
        .route("/auth/logout", post(handlers::logout))
        .route("/products", get(handlers::get_product))
        .route("/tax/{tax_id}", get(handlers::get_tax))
        .route("/purchase", post(handlers::purchase))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
