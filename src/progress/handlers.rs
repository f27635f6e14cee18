use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{macros::format_description, Date};
use tracing::{error, instrument, warn};

use crate::{
    auth::services::AuthUser,
    nutrition::error::ValidationError,
    progress::{
        dto::ProgressResponse,
        repo_types::DailyProgress,
        services::{self, MONTH_DAYS, WEEK_DAYS},
    },
    state::AppState,
};

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/progress/weekly", get(weekly))
        .route("/progress/monthly", get(monthly))
        .route("/progress/:date/recompute", post(recompute))
}

pub(crate) fn parse_date(raw: &str) -> Result<Date, ValidationError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

async fn window_response(
    state: &AppState,
    user_id: uuid::Uuid,
    days: u32,
) -> Result<Json<ProgressResponse>, (StatusCode, String)> {
    services::progress_window(&state.db, user_id, days)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, days, "load progress failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

#[instrument(skip(state))]
pub async fn weekly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProgressResponse>, (StatusCode, String)> {
    window_response(&state, user_id, WEEK_DAYS).await
}

#[instrument(skip(state))]
pub async fn monthly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProgressResponse>, (StatusCode, String)> {
    window_response(&state, user_id, MONTH_DAYS).await
}

#[instrument(skip(state))]
pub async fn recompute(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(raw_date): Path<String>,
) -> Result<Json<DailyProgress>, (StatusCode, String)> {
    let date = parse_date(&raw_date).map_err(|e| {
        warn!(user_id = %user_id, error = %e, "bad recompute date");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let record = services::recompute(&state.db, user_id, date)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, %date, "recompute failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(record))
}
