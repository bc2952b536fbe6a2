use crate::api::models::AppState;
use crate::api::review::handlers::{list_reviews_handler, submit_review_handler};
use axum::{
    Router,
    routing::{get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", get(list_reviews_handler))
        .route("/api/submit_review", post(submit_review_handler))
}
