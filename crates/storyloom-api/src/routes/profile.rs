//! Routes for the User Profile bounded context.

use axum::extract::State;
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use storyloom_core::profile::UserProfile;
use storyloom_profile::application::{command_handlers, query_handlers};
use storyloom_profile::domain::commands;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /, sent by the account-created hook.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProfileRequest {
    /// Display name from the identity provider.
    pub display_name: Option<String>,
    /// E-mail address from the identity provider.
    pub email: Option<String>,
}

/// Request body for PATCH /preferences.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePreferencesRequest {
    /// Preferred language tag.
    pub language: Option<String>,
    /// Preferred timezone.
    pub timezone: Option<String>,
    /// Whether notifications are allowed.
    pub allow_notifications: Option<bool>,
}

/// POST /
#[instrument(skip_all, fields(user_id = %caller.user_id))]
async fn create_profile(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(request): Json<CreateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let command = commands::CreateProfile {
        correlation_id: Uuid::new_v4(),
        user_id: caller.user_id,
        display_name: request.display_name,
        email: request.email,
    };

    info!(correlation_id = %command.correlation_id, "handling create_profile command");

    let profile = command_handlers::handle_create_profile(
        &command,
        state.clock.as_ref(),
        &*state.profile_repository,
    )
    .await?;

    Ok(Json(profile))
}

/// GET /
#[instrument(skip_all, fields(user_id = %caller.user_id))]
async fn get_profile(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = query_handlers::get_profile(&caller.user_id, &*state.profile_repository).await?;
    Ok(Json(profile))
}

/// PATCH /preferences
#[instrument(skip_all, fields(user_id = %caller.user_id))]
async fn update_preferences(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let command = commands::UpdatePreferences {
        correlation_id: Uuid::new_v4(),
        user_id: caller.user_id,
        language: request.language,
        timezone: request.timezone,
        allow_notifications: request.allow_notifications,
    };

    info!(correlation_id = %command.correlation_id, "handling update_preferences command");

    let profile = command_handlers::handle_update_preferences(
        &command,
        state.clock.as_ref(),
        &*state.profile_repository,
    )
    .await?;

    Ok(Json(profile))
}

/// Returns the router for the profile context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_profile).get(get_profile))
        .route("/preferences", patch(update_preferences))
}
