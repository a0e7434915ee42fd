use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::{ApiError as ApiErrorBody, FormError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("question must not be empty")]
    EmptyQuestion,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Form(_) | ApiError::EmptyQuestion => StatusCode::BAD_REQUEST,
        };
        tracing::debug!("rejecting request: {self}");
        (
            status,
            Json(ApiErrorBody {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
