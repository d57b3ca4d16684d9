//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use timer24h_domain::error::TimerError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps engine failures to HTTP responses with an appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    Timer(TimerError),
    NotFound(String),
}

impl From<TimerError> for ApiError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Timer(TimerError::ConfigInvalid(err)) => {
                (StatusCode::BAD_REQUEST, format!("invalid configuration: {err}"))
            }
            Self::Timer(TimerError::Validation(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Timer(err) => {
                tracing::error!(error = %err, "engine error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
