//! Storyloom API library: routing, state, and error mapping.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;

use crate::state::AppState;

/// Builds the application router without middleware layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/tales", routes::tales::router())
        .nest("/api/v1/catalog", routes::catalog::router())
        .nest("/api/v1/profile", routes::profile::router())
        .with_state(state)
}
