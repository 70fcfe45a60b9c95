use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::{ErrorBody, QueryError};

// Errors surfaced to callers of /api/currency
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Currency API is not available")]
    UpstreamUnavailable,

    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody::new(self.to_string(), status.as_u16());
        (status, Json(body)).into_response()
    }
}
