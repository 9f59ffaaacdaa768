use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mona_service::InfoError;
use serde_json::json;
use tracing::error;

/// Failure returned by a route handler.
///
/// Renders as `{"error": <message>, "status": <code>}` with the matching
/// status line.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Returns the status this error responds with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<InfoError> for ApiError {
    fn from(err: InfoError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %err, "request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16(),
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_provider_status_and_message() {
        let err = ApiError::from(InfoError::Provider {
            status: 429,
            message: "Rate limit reached".to_owned(),
        });
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.message, "Rate limit reached");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
