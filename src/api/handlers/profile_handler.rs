//! Profile API Handlers
//!
//! HTTP handlers for reading and merging user health profiles.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::profile_dto::*},
    error::AppError,
};

/// Create or merge a profile
///
/// PUT /api/v1/profiles/:user_id
pub async fn upsert_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Upserting profile for user: {}", user_id);

    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    if request.profile.is_empty() {
        return Err(AppError::Validation(
            "profile must contain at least one field".to_string(),
        ));
    }

    state
        .profile_repository
        .upsert(&user_id, &request.profile)
        .await?;

    Ok(Json(UpsertProfileResponse {
        status: "success".to_string(),
        user_id,
    }))
}

/// Get a profile by user id
///
/// GET /api/v1/profiles/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting profile for user: {}", user_id);

    let profile = state
        .profile_repository
        .get(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile not found for user: {}", user_id)))?;

    Ok(Json(ProfileResponse { user_id, profile }))
}
