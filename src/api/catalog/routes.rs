use crate::api::catalog::handlers::{list_foods_handler, search_handler};
use crate::api::models::AppState;
use axum::{Router, routing::get};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/foods", get(list_foods_handler))
        .route("/api/search", get(search_handler))
}
