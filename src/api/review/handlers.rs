use crate::api::models::*;
use crate::notify::Notification;
use crate::storage::Review;
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use tracing::{info, warn};

pub async fn submit_review_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitReviewRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, AppError> {
    // Validate
    let mut review = json_body(payload)?
        .validate()
        .map_err(AppError::BadRequest)?;

    // Unknown foods are stored as general feedback
    if let Some(food_id) = review.food_id {
        if !state.db.food_exists(food_id).await? {
            warn!(food_id, "Review references unknown food, storing without it");
            review.food_id = None;
        }
    }

    // Store
    let id = state.db.insert_review(&review).await?;
    info!(review_id = id, rating = review.rating, food_id = ?review.food_id, "Review added");

    // Notify owner, best-effort
    state.notifier.notify(Notification::Review {
        name: review.name,
        rating: review.rating,
        comment: review.comment,
    });

    Ok(OkResponse::success())
}

pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = state.db.list_reviews(filter.food_id()).await?;
    Ok(Json(reviews))
}
