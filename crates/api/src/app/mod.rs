//! HTTP adapter (Axum router) around [`AuthHandler`].
//!
//! - `routes/`: HTTP handlers
//! - `response.rs`: envelope → HTTP response mapping

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handler::AuthHandler;

pub mod response;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(handler: Arc<AuthHandler>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth", post(routes::auth::issue))
        .route("/invoke", post(routes::auth::invoke))
        .with_state(handler)
}
