use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::storage::{Database, NewReview};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub notifier: Notifier,
    pub config: Arc<AppConfig>,
}

/// Review submission body. Every field is optional on the wire and validated afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitReviewRequest {
    pub name: Option<String>,
    pub rating: Option<Value>,
    pub comment: Option<String>,
    pub food_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BulkInquiryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderRequest {
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewFilter {
    pub food_id: Option<String>,
}

impl ReviewFilter {
    /// A missing, non-numeric, or zero id means "all reviews"
    pub fn food_id(&self) -> Option<i64> {
        self.food_id
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|&id| id != 0)
    }
}

/// `{ "ok": true }`
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn success() -> Json<Self> {
        Json(Self { ok: true })
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_foods: usize,
    pub total_reviews: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

pub const INVALID_REVIEW: &str = "Invalid review data";
pub const MISSING_FIELDS: &str = "Missing fields";
pub const ADDRESS_REQUIRED: &str = "Address is required";

/// Trim an optional field, treating absence as blank
pub fn trimmed(field: Option<String>) -> String {
    field.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Coerce a JSON value to an integer: integers, truncated floats, and numeric strings
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl SubmitReviewRequest {
    /// Validate into an insertable review. Blank names become "Anonymous".
    pub fn validate(self) -> Result<NewReview, String> {
        let rating = self
            .rating
            .as_ref()
            .and_then(coerce_int)
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| INVALID_REVIEW.to_string())?;

        let comment = trimmed(self.comment);
        if comment.is_empty() {
            return Err(INVALID_REVIEW.to_string());
        }

        let name = trimmed(self.name);
        Ok(NewReview {
            food_id: self.food_id.as_ref().and_then(coerce_int),
            name: if name.is_empty() {
                "Anonymous".to_string()
            } else {
                name
            },
            rating: rating as u8,
            comment,
        })
    }
}

/// Trimmed `(name, email, body)` if all three are present
fn require_three(
    name: Option<String>,
    email: Option<String>,
    body: Option<String>,
) -> Result<(String, String, String), String> {
    let (name, email, body) = (trimmed(name), trimmed(email), trimmed(body));
    if name.is_empty() || email.is_empty() || body.is_empty() {
        return Err(MISSING_FIELDS.to_string());
    }
    Ok((name, email, body))
}

impl ContactRequest {
    pub fn validate(self) -> Result<(String, String, String), String> {
        require_three(self.name, self.email, self.message)
    }
}

impl BulkInquiryRequest {
    pub fn validate(self) -> Result<(String, String, String), String> {
        require_three(self.name, self.email, self.purpose)
    }
}

impl OrderRequest {
    pub fn validate(self) -> Result<String, String> {
        let address = trimmed(self.address);
        if address.is_empty() {
            return Err(ADDRESS_REQUIRED.to_string());
        }
        Ok(address)
    }
}

/// Unwrap a JSON body, turning a malformed one into a client error
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(e) => {
                error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                ok: false,
                error: message,
            }),
        )
            .into_response()
    }
}
