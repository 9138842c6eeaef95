use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures surfaced to callers of the relay endpoints
#[derive(Error, Debug)]
pub enum RelayError {
    /// Malformed or disallowed input; nothing has been fetched yet
    #[error("{0}")]
    Validation(String),

    /// The document host answered with a non-success status
    #[error("{reason} (upstream status {status})")]
    Upstream { status: u16, reason: &'static str },

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            RelayError::Validation(message) | RelayError::NotFound(message) => message,
            RelayError::Upstream { reason, .. } => reason.to_string(),
            RelayError::Internal(cause) => {
                log::error!("unhandled relay fault: {:#}", cause);
                "Server Error".to_string()
            }
        };
        (status, body).into_response()
    }
}

/// Per-template failures; recovered by the index builder, never surfaced
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template fetch returned status {0}")]
    Status(u16),

    #[error("template fetch failed: {0}")]
    Network(#[from] anyhow::Error),

    #[error("template is not a valid document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_passed_through() {
        let err = RelayError::Upstream {
            status: 404,
            reason: "Failed to fetch file content",
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unrepresentable_upstream_status_becomes_bad_gateway() {
        let err = RelayError::Upstream {
            status: 42,
            reason: "Failed to fetch image",
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let response = RelayError::Internal(anyhow::anyhow!("connection reset")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
