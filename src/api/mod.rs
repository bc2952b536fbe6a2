pub mod catalog;
pub mod inquiry;
pub mod models;
pub mod order;
pub mod pages;
pub mod review;

#[cfg(test)]
mod tests;

// Re-exports
pub use models::*;

use axum::{Json, Router, extract::State, routing::get};
use tower_http::services::ServeDir;

// Health handler (simple, keep here)
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    Ok(Json(models::HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_foods: state.db.count_foods().await?,
        total_reviews: state.db.count_reviews().await?,
    }))
}

/// Every page and API route, with static assets under `/static`
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/health", get(health_handler))
        .merge(pages::routes())
        .merge(catalog::routes())
        .merge(review::routes())
        .merge(inquiry::routes())
        .merge(order::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
