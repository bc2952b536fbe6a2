use crate::api::models::*;
use crate::fuzzy;
use crate::storage::Food;
use axum::{
    Json,
    extract::{Query, State},
};
use tracing::info;

pub async fn list_foods_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Food>>, AppError> {
    let foods = state.db.list_foods().await?;
    Ok(Json(foods))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let names = state.db.food_names().await?;
    let suggestions = fuzzy::suggest(query, &names);

    info!(query = %query, found = suggestions.len(), "Search complete");

    Ok(Json(suggestions))
}
