//! Routes for the Component Catalog bounded context.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use storyloom_catalog::application::query_handlers;
use storyloom_core::catalog::GroupedCatalog;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for GET /.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Requested language tag.
    pub language: Option<String>,
}

/// GET /
#[instrument(skip(state))]
async fn get_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<GroupedCatalog>, ApiError> {
    let catalog = query_handlers::get_catalog(&state.catalog, query.language.as_deref()).await?;
    Ok(Json(GroupedCatalog::clone(&catalog)))
}

/// Returns the router for the catalog context.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_catalog))
}
