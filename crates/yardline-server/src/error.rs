//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;
use yardline_core::error::{ErrorCategory, ErrorSeverity, YardlineError};

/// Status code for an error category.
pub fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::Database | ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A [`YardlineError`] rendered as `{ error, category, severity }`.
#[derive(Debug)]
pub struct ApiError(pub YardlineError);

impl From<YardlineError> for ApiError {
    fn from(err: YardlineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let category = self.0.category();
        let severity = self.0.severity();
        if severity >= ErrorSeverity::High {
            error!(error = %self.0, ?category, "Request failed");
        }

        let body = Json(json!({
            "error": self.0.to_string(),
            "category": category,
            "severity": severity,
        }));
        (status_for(category), body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
