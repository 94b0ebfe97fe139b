//! Error types for the dashboard HTTP API

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Request body or parameter could not be understood
    InvalidParameter(String),
    /// Chart name in the path is not one of the dashboard's charts
    UnknownChart(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            ApiError::UnknownChart(chart) => write!(f, "Unknown chart: {}", chart),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::InvalidParameter(msg) => {
                (StatusCode::BAD_REQUEST, "InvalidParameter", msg.clone())
            }
            ApiError::UnknownChart(chart) => (
                StatusCode::NOT_FOUND,
                "UnknownChart",
                format!(
                    "Chart '{}' not found; expected one of monthly, race, time-of-day",
                    chart
                ),
            ),
        };

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidParameter(format!("JSON error: {}", rejection.body_text()))
    }
}
