use crate::api::models::*;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

pub async fn contact_handler(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, AppError> {
    let (name, email, message) = json_body(payload)?
        .validate()
        .map_err(AppError::BadRequest)?;

    let id = state.db.insert_contact(&name, &email, &message).await?;
    info!(contact_id = id, "Contact message stored");

    Ok(OkResponse::success())
}

pub async fn bulk_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkInquiryRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, AppError> {
    let (name, email, purpose) = json_body(payload)?
        .validate()
        .map_err(AppError::BadRequest)?;

    let id = state.db.insert_bulk_request(&name, &email, &purpose).await?;
    info!(bulk_id = id, "Bulk request stored");

    Ok(OkResponse::success())
}
