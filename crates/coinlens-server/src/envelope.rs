//! Uniform JSON envelope for every API response.
//!
//! Success is `{"success": true, "data": ...}` with HTTP 200. Failures are
//! `{"success": false, "error": "..."}` with a status chosen by error kind.
//! Upstream detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coinlens_core::{AggregatorError, AggregatorErrorKind, ValidationError};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiEnvelope<()> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiEnvelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Handler error carrying the aggregator failure to the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError(AggregatorError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            AggregatorErrorKind::NotFound | AggregatorErrorKind::IncompleteData => {
                StatusCode::NOT_FOUND
            }
            AggregatorErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            AggregatorErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AggregatorErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing message. Only validation failures echo their detail.
    pub fn public_message(&self) -> String {
        match self.0.kind() {
            AggregatorErrorKind::NotFound => String::from("No data found"),
            AggregatorErrorKind::IncompleteData => String::from("Incomplete data"),
            AggregatorErrorKind::RateLimited => String::from("Rate limit exceeded"),
            AggregatorErrorKind::Upstream => String::from("Failed to fetch data"),
            AggregatorErrorKind::InvalidRequest => self.0.message().to_owned(),
        }
    }
}

impl From<AggregatorError> for ApiError {
    fn from(error: AggregatorError) -> Self {
        Self(error)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(
            code = self.0.code(),
            status = status.as_u16(),
            cause = %self.0.message(),
            "request failed"
        );
        (status, ApiEnvelope::failure(self.public_message())).into_response()
    }
}

pub type ApiResult<T> = Result<ApiEnvelope<T>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_kinds_to_status_and_message() {
        let cases = [
            (AggregatorError::not_found("x"), 404, "No data found"),
            (AggregatorError::incomplete_data("x"), 404, "Incomplete data"),
            (AggregatorError::rate_limited("x"), 429, "Rate limit exceeded"),
            (AggregatorError::upstream("secret detail"), 500, "Failed to fetch data"),
        ];

        for (error, status, message) in cases {
            let api_error = ApiError::from(error);
            assert_eq!(api_error.status().as_u16(), status);
            assert_eq!(api_error.public_message(), message);
        }
    }

    #[test]
    fn validation_errors_are_bad_requests_with_detail() {
        let api_error = ApiError::from(ValidationError::EmptySymbol);
        assert_eq!(api_error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api_error.public_message(), "symbol cannot be empty");
    }

    #[test]
    fn failure_envelope_omits_data() {
        let json = serde_json::to_value(ApiEnvelope::failure("No data found")).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "No data found"})
        );
    }
}
