//! Error taxonomy of the enrichment service.

use std::time::Duration;

use http::StatusCode;
use mona_adapters::traits::AdapterError;
use mona_catalogue::CatalogueError;
use mona_prompts::TemplateError;
use thiserror::Error;

/// Result alias for service operations.
pub type InfoResult<T> = Result<T, InfoError>;

/// Failures surfaced by [`ArtworkInfoService`](crate::ArtworkInfoService).
#[derive(Debug, Error)]
pub enum InfoError {
    /// No artwork carries the requested id.
    #[error("artwork `{id}` not found")]
    NotFound {
        /// Requested identifier.
        id: String,
    },

    /// No provider credential is configured.
    #[error("text generation is not configured: set OPENAI_API_KEY")]
    Unconfigured,

    /// The request payload was unusable.
    #[error("{reason}")]
    InvalidInput {
        /// Human-readable reason.
        reason: String,
    },

    /// The provider answered with a non-success status.
    #[error("{message}")]
    Provider {
        /// Status returned by the provider.
        status: u16,
        /// Provider-supplied or generic message.
        message: String,
    },

    /// The provider did not answer within the configured timeout.
    #[error("timed out after {}s waiting for the provider", .after.as_secs())]
    Timeout {
        /// Timeout that elapsed.
        after: Duration,
    },

    /// The provider could not be reached.
    #[error("connection error: {reason}")]
    Connection {
        /// Additional context.
        reason: String,
    },

    /// The provider exchange failed in an unexpected way.
    #[error("unexpected error: {reason}")]
    Unexpected {
        /// Additional context.
        reason: String,
    },

    /// The catalogue could not be written.
    #[error("failed to save the catalogue: {source}")]
    Persistence {
        /// Underlying store error.
        #[source]
        source: CatalogueError,
    },

    /// The catalogue could not be read or is malformed.
    #[error("catalogue unavailable: {source}")]
    CatalogueUnavailable {
        /// Underlying store error.
        #[source]
        source: CatalogueError,
    },

    /// A prompt template could not be rendered.
    #[error("prompt template error: {source}")]
    Template {
        /// Underlying template error.
        #[from]
        source: TemplateError,
    },
}

impl InfoError {
    /// Convenience constructor for unknown ids.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Convenience constructor for invalid input.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status this error maps to.
    ///
    /// Provider errors reuse the provider's own status; an out-of-range value
    /// degrades to `502 Bad Gateway`.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Provider { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Unconfigured
            | Self::Connection { .. }
            | Self::Unexpected { .. }
            | Self::Persistence { .. }
            | Self::CatalogueUnavailable { .. }
            | Self::Template { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AdapterError> for InfoError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Configuration { .. } => Self::Unconfigured,
            AdapterError::Provider { status, message } => Self::Provider { status, message },
            AdapterError::Timeout { after } => Self::Timeout { after },
            AdapterError::Connection { reason } => Self::Connection { reason },
            AdapterError::InvalidRequest { reason } | AdapterError::UnexpectedResponse { reason } => {
                Self::Unexpected { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let cases = [
            (InfoError::not_found("x"), StatusCode::NOT_FOUND),
            (InfoError::Unconfigured, StatusCode::INTERNAL_SERVER_ERROR),
            (InfoError::invalid_input("bad"), StatusCode::BAD_REQUEST),
            (
                InfoError::Provider {
                    status: 429,
                    message: "slow down".to_owned(),
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                InfoError::Timeout {
                    after: Duration::from_secs(60),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                InfoError::Connection {
                    reason: "refused".to_owned(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                InfoError::CatalogueUnavailable {
                    source: CatalogueError::InvalidRecord("broken"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
        }
    }

    #[test]
    fn invalid_provider_status_degrades_to_bad_gateway() {
        let err = InfoError::Provider {
            status: 42,
            message: "odd".to_owned(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn adapter_errors_keep_their_kind() {
        let err = InfoError::from(AdapterError::Provider {
            status: 401,
            message: "Incorrect API key provided".to_owned(),
        });
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Incorrect API key provided");

        let err = InfoError::from(AdapterError::Timeout {
            after: Duration::from_secs(5),
        });
        assert!(matches!(err, InfoError::Timeout { .. }));

        let err = InfoError::from(AdapterError::unexpected("no choices"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = InfoError::from(AdapterError::configuration("no key"));
        assert!(matches!(err, InfoError::Unconfigured));
    }
}
