use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, instrument, warn};

use crate::{
    auth::services::AuthUser,
    profile::{
        dto::{ProfileResponse, ProfileUpdate},
        repo, services,
    },
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).patch(update_profile))
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Profile not found".into())
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let profile = repo::get(&state.db, user_id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "load profile failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or_else(not_found)?;
    Ok(Json(profile.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    if let Err(e) = services::validate(&payload) {
        warn!(user_id = %user_id, error = %e, "invalid profile update");
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    let profile = services::update_profile(&state.db, user_id, payload)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "update profile failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or_else(not_found)?;
    Ok(Json(profile.into()))
}
