//! Errors surfaced by the HTTP layer.
//!
//! Search itself cannot fail; these cover request validation, unknown
//! resources and anything unexpected inside a handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing request parameters.
    #[error("{0}")]
    BadRequest(String),

    #[error("No encontrado")]
    NotFound,

    /// Details are logged, never returned to the client.
    #[error("Error interno")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            tracing::error!("Request failed: {:#}", err);
        }
        let body = ApiResponse::<()>::failure(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
