use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    meals::{
        dto::{AnalyzeMealRequest, AnalyzeMealResponse, DailySummary, MealDetails, MealListItem, Pagination},
        repo,
        services::{self, LogMealError},
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/daily-summary", get(daily_summary))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/meals/analyze", post(analyze_meal))
}

#[instrument(skip(state, payload))]
pub async fn analyze_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AnalyzeMealRequest>,
) -> Result<(StatusCode, Json<AnalyzeMealResponse>), (StatusCode, String)> {
    match services::log_meal(&state, user_id, payload).await {
        Ok(resp) => Ok((StatusCode::CREATED, Json(resp))),
        Err(LogMealError::Invalid(e)) => {
            warn!(user_id = %user_id, error = %e, "rejected meal");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(LogMealError::Storage(e)) => {
            error!(error = %e, user_id = %user_id, "log meal failed");
            Err(internal(e))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<MealListItem>>, (StatusCode, String)> {
    let (limit, offset) = p.clamped();
    let meals = repo::list_by_user(&state.db, user_id, limit, offset)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "list meals failed");
            internal(e)
        })?;
    Ok(Json(meals.into_iter().map(MealListItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealDetails>, (StatusCode, String)> {
    match repo::get(&state.db, user_id, id).await {
        Ok(Some(meal)) => Ok(Json(meal.into())),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Meal not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "get_meal failed");
            Err(internal(e))
        }
    }
}

#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DailySummary>, (StatusCode, String)> {
    services::daily_summary(&state, user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "daily summary failed");
            internal(e)
        })
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
