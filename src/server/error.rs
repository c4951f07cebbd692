// ABOUTME: Maps BridgeError onto HTTP status codes and {error, message} bodies

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::BridgeError;

impl BridgeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter { .. } | Self::NotAGitRepository { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::ExternalCommandTimeout { .. }
            | Self::ExternalCommandFailure { .. }
            | Self::StreamDisconnected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
