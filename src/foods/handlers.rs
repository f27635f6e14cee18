use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::services::AuthUser,
    foods::dto::{SearchQuery, MAX_PAGE_SIZE},
    nutrition::{error::ValidationError, food_lookup::FoodRecord},
    state::AppState,
};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/search", get(search_foods))
        .route("/foods/:fdc_id", get(get_food))
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<FoodRecord>>, (StatusCode, String)> {
    let query = params.q.trim();
    if query.is_empty() {
        warn!(user_id = %user_id, "empty food search");
        return Err((StatusCode::BAD_REQUEST, ValidationError::EmptyQuery.to_string()));
    }
    let page_size = params.page_size.clamp(1, MAX_PAGE_SIZE);
    Ok(Json(state.food_lookup.search(query, page_size).await))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(fdc_id): Path<i64>,
) -> Result<Json<FoodRecord>, (StatusCode, String)> {
    state
        .food_lookup
        .get_by_id(fdc_id)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Food not found".into()))
}
