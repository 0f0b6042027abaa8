//! HTTP mapping of pipeline errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use insight_core::{AnalysisError, ErrorCategory};
use serde::{Deserialize, Serialize};

/// Error body returned on every non-2xx analysis response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Pipeline failure on its way to the client
#[derive(Debug)]
pub struct ApiError(pub AnalysisError);

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0.category() {
            ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCategory::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCategory::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
