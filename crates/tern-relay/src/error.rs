//! Error responses returned by the relay

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::handler::TEXT_PLAIN_UTF8;

/// Everything that can end a chat request early. None of these are retried.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Request used a verb other than POST
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// No upstream API key is configured
    #[error("API key not configured")]
    CredentialMissing,

    /// Upstream rejected the request; status and body are passed through verbatim
    #[error("Upstream error ({status})")]
    Upstream { status: u16, body: Vec<u8> },

    /// Anything else that went wrong while handling the request
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::Internal(message.to_string())
    }

    /// Status code this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::CredentialMissing | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl From<tern_ai::Error> for RelayError {
    fn from(err: tern_ai::Error) -> Self {
        match err {
            tern_ai::Error::Upstream { status, body } => Self::Upstream { status, body },
            tern_ai::Error::InvalidApiKey => Self::CredentialMissing,
            other => Self::internal(other),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            RelayError::Upstream { body, .. } => {
                (status, [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], body).into_response()
            }
            RelayError::Internal(message) => {
                tracing::error!(error = %message, "chat request failed");
                (
                    status,
                    Json(json!({ "error": "An internal error occurred." })),
                )
                    .into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
