use crate::api::models::AppState;
use crate::api::pages::handlers::*;
use axum::{Router, routing::get};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/categories", get(categories_page))
        .route("/feedback", get(feedback_page))
        .route("/bulk", get(bulk_page))
        .route("/enter_address", get(enter_address_page))
        .route("/order_confirmed", get(order_confirmed_page))
}
