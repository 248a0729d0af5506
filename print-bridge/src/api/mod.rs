//! HTTP API
//!
//! A single catch-all handler; see [`handler`] for the method table.

pub mod handler;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::core::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(handler::handle_request)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
