//! Errors from the remote schedule API and their HTTP mapping.
//!
//! The browser only ever sees one human-readable message; the variants exist
//! so the server can pick a status code.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("could not reach the schedule API: {0}")]
    Transport(#[from] reqwest::Error),

    /// Error reported by the remote API itself
    #[error("{0}")]
    Remote(String),

    #[error("unexpected response from the schedule API: {0}")]
    Decode(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Invalid(String),

    #[error("invalid email or password")]
    Unauthorized,

    /// Mutation sent without a bearer token, or with one that has expired
    #[error("sign in to make changes")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),
}

impl BackendError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Transport(_) | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::Remote(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

// Extractor rejections keep the `{"error": ...}` body shape
impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for BackendError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Invalid(rejection.body_text())
    }
}

impl From<PathRejection> for BackendError {
    fn from(rejection: PathRejection) -> Self {
        Self::Invalid(rejection.body_text())
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(%status, error = %self, "Request failed");
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
