//! Routes for the Tales bounded context.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use storyloom_core::tale::{Character, Equipment, Place, Tale, TaleComponents, TaleStyle};
use storyloom_tales::application::orchestrator::GenerationAck;
use storyloom_tales::application::query_handlers::{self, TalePage};
use storyloom_tales::application::command_handlers;
use storyloom_tales::domain::commands;

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateTaleRequest {
    /// Tale title.
    #[serde(default)]
    pub title: String,
    /// Story components.
    #[serde(default)]
    pub components: TaleComponents,
    /// Narrative style.
    #[serde(default)]
    pub style: TaleStyle,
}

/// Component changes in PATCH /{tale_id}. Absent fields are kept.
#[derive(Debug, Default, Deserialize)]
pub struct ComponentsPatchRequest {
    /// Replacement hero.
    pub hero: Option<Character>,
    /// Replacement friends.
    pub friends: Option<Vec<Character>>,
    /// Replacement equipment.
    pub equipment: Option<Vec<Equipment>>,
    /// Replacement villains.
    pub villains: Option<Vec<Character>>,
    /// Replacement places.
    pub places: Option<Vec<Place>>,
}

impl From<ComponentsPatchRequest> for commands::ComponentsPatch {
    fn from(request: ComponentsPatchRequest) -> Self {
        Self {
            hero: request.hero,
            friends: request.friends,
            equipment: request.equipment,
            villains: request.villains,
            places: request.places,
        }
    }
}

/// Request body for PATCH /{tale_id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaleRequest {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New style.
    pub style: Option<TaleStyle>,
    /// Component changes.
    pub components: Option<ComponentsPatchRequest>,
}

/// Query string for GET /.
#[derive(Debug, Default, Deserialize)]
pub struct ListTalesQuery {
    /// Requested page size.
    pub limit: Option<u32>,
    /// Id of the last tale of the previous page.
    pub start_after: Option<Uuid>,
}

/// POST /
#[instrument(skip_all, fields(user_id = %caller.user_id))]
async fn create_tale(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(request): Json<CreateTaleRequest>,
) -> Result<(StatusCode, Json<Tale>), ApiError> {
    let command = commands::CreateTale {
        correlation_id: Uuid::new_v4(),
        user_id: caller.user_id,
        title: request.title,
        components: request.components,
        style: request.style,
    };

    info!(correlation_id = %command.correlation_id, "handling create_tale command");

    let tale = command_handlers::handle_create_tale(
        &command,
        state.clock.as_ref(),
        &*state.tale_repository,
        &*state.profile_repository,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(tale)))
}

/// GET /
#[instrument(skip_all, fields(user_id = %caller.user_id))]
async fn list_tales(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(query): Query<ListTalesQuery>,
) -> Result<Json<TalePage>, ApiError> {
    let page = query_handlers::list_tales(
        &caller.user_id,
        query.limit,
        query.start_after,
        &*state.tale_repository,
    )
    .await?;

    Ok(Json(page))
}

/// GET /{tale_id}
#[instrument(skip_all, fields(tale_id = %tale_id))]
async fn get_tale(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(tale_id): Path<Uuid>,
) -> Result<Json<Tale>, ApiError> {
    let tale = query_handlers::get_tale(tale_id, &caller.user_id, &*state.tale_repository).await?;
    Ok(Json(tale))
}

/// PATCH /{tale_id}
#[instrument(skip_all, fields(tale_id = %tale_id))]
async fn update_tale(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(tale_id): Path<Uuid>,
    Json(request): Json<UpdateTaleRequest>,
) -> Result<Json<Tale>, ApiError> {
    let command = commands::UpdateTale {
        correlation_id: Uuid::new_v4(),
        tale_id,
        caller_id: caller.user_id,
        title: request.title,
        body: request.body,
        style: request.style,
        components: request.components.map(Into::into),
    };

    info!(correlation_id = %command.correlation_id, "handling update_tale command");

    let tale = command_handlers::handle_update_tale(
        &command,
        state.clock.as_ref(),
        &*state.tale_repository,
    )
    .await?;

    Ok(Json(tale))
}

/// DELETE /{tale_id}
#[instrument(skip_all, fields(tale_id = %tale_id))]
async fn delete_tale(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(tale_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteTale {
        correlation_id: Uuid::new_v4(),
        tale_id,
        caller_id: caller.user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_tale command");

    command_handlers::handle_delete_tale(&command, &*state.tale_repository).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /{tale_id}/generate
#[instrument(skip_all, fields(tale_id = %tale_id))]
async fn request_generation(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(tale_id): Path<Uuid>,
) -> Result<(StatusCode, Json<GenerationAck>), ApiError> {
    let command = commands::RequestGeneration {
        correlation_id: Uuid::new_v4(),
        tale_id,
        caller_id: caller.user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling request_generation command");

    let ack = state.orchestrator.request_generation(&command).await?;

    Ok((StatusCode::ACCEPTED, Json(ack)))
}

/// Returns the router for the tales context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tale).get(list_tales))
        .route(
            "/{tale_id}",
            get(get_tale).patch(update_tale).delete(delete_tale),
        )
        .route("/{tale_id}/generate", post(request_generation))
}
