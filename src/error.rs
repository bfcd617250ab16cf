use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{debug, error};
use sea_orm::DbErr;
use thiserror::Error;

/// Failure of a directory query or mutation.
///
/// Validation and not-found conditions are raised before anything is written,
/// so only `Store` can interrupt a transaction.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid submission: {0}")]
    Validation(String),

    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: i32 },

    #[error("store error: {0}")]
    Store(#[from] DbErr),
}

impl DirectoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        DirectoryError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        DirectoryError::NotFound { entity, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DirectoryError::Validation(_) => StatusCode::BAD_REQUEST,
            DirectoryError::NotFound { .. } => StatusCode::NOT_FOUND,
            DirectoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        match &self {
            DirectoryError::Store(e) => error!("request failed: {e}"),
            other => debug!("request rejected: {other}"),
        }
        (self.status(), self.to_string()).into_response()
    }
}
