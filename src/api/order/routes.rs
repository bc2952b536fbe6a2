use crate::api::models::AppState;
use crate::api::order::handlers::submit_order_handler;
use axum::{Router, routing::post};

pub fn routes() -> Router<AppState> {
    Router::new().route("/submit_order", post(submit_order_handler))
}
