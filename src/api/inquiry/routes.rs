use crate::api::inquiry::handlers::{bulk_handler, contact_handler};
use crate::api::models::AppState;
use axum::{Router, routing::post};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(contact_handler))
        .route("/api/bulk", post(bulk_handler))
}
