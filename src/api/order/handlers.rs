use crate::api::models::*;
use crate::notify::Notification;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

/// Record a delivery order and tell the owner about it
pub async fn submit_order_handler(
    State(state): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, AppError> {
    let address = json_body(payload)?
        .validate()
        .map_err(AppError::BadRequest)?;

    let id = state.db.insert_order(&address).await?;
    info!(order_id = id, "Order stored");

    state.notifier.notify(Notification::Order { address });

    Ok(OkResponse::success())
}
