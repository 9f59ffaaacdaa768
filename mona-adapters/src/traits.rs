//! Shared generator traits and data structures.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by generators.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by generator implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter is misconfigured or missing credentials.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid for the target model.
    #[error("invalid generation request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("{message}")]
    Provider {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider-supplied message, or a generic one naming the status.
        message: String,
    },

    /// No complete response arrived within the configured timeout.
    #[error("provider request timed out after {}s", .after.as_secs())]
    Timeout {
        /// Timeout that elapsed.
        after: Duration,
    },

    /// Network-level failure (DNS, connect, reset, ...).
    #[error("connection error: {reason}")]
    Connection {
        /// Additional context about the error.
        reason: String,
    },

    /// The provider reported success but the body lacked the expected text.
    #[error("unexpected provider response: {reason}")]
    UnexpectedResponse {
        /// Additional context about the response failure.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for network failures.
    #[must_use]
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for malformed success responses.
    #[must_use]
    pub fn unexpected(reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            reason: reason.into(),
        }
    }
}

/// Minimal metadata describing a generator instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterMetadata {
    provider: &'static str,
    model: String,
}

impl AdapterMetadata {
    /// Creates metadata for the supplied provider and default model.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier (e.g., "openai").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the default model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Roles supported in chat-style prompts.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System messages steer the assistant behaviour.
    System,
    /// User-authored content.
    User,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
        })
    }
}

/// Represents a message in a chat-style prompt.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PromptMessage {
    role: MessageRole,
    content: String,
}

impl PromptMessage {
    /// Creates a new prompt message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Request submitted to a generator.
///
/// Unset options fall back to the generator's own defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    messages: Vec<PromptMessage>,
    model: Option<String>,
    max_output_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Option<Duration>,
}

impl GenerationRequest {
    /// Creates the usual two-message request: a system persona and a user prompt.
    #[must_use]
    pub fn chat(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![
                PromptMessage::new(MessageRole::System, system),
                PromptMessage::new(MessageRole::User, user),
            ],
            model: None,
            max_output_tokens: None,
            temperature: None,
            timeout: None,
        }
    }

    /// Overrides the model for this request.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the maximum output token budget.
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Bounds the whole exchange (connect, send, read) by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the prompt messages.
    #[must_use]
    pub fn messages(&self) -> &[PromptMessage] {
        &self.messages
    }

    /// Returns the model override, if any.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the configured maximum output tokens.
    #[must_use]
    pub const fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    /// Returns the configured sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Returns the per-request timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Trait implemented by all text generators.
///
/// One call is one provider request: no retries, streaming or caching.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns basic metadata describing the generator instance.
    fn metadata(&self) -> &AdapterMetadata;

    /// Executes the request and returns the generated text.
    async fn generate(&self, request: GenerationRequest) -> AdapterResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_chat_request() {
        let request = GenerationRequest::chat("persona", "ping")
            .with_model("gpt-4o-mini")
            .with_max_output_tokens(256)
            .with_temperature(0.7)
            .with_timeout(Duration::from_secs(5));

        assert_eq!(request.messages().len(), 2);
        assert_eq!(request.messages()[0].role(), MessageRole::System);
        assert_eq!(request.messages()[1].content(), "ping");
        assert_eq!(request.model(), Some("gpt-4o-mini"));
        assert_eq!(request.max_output_tokens(), Some(256));
        assert_eq!(request.temperature(), Some(0.7));
        assert_eq!(request.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn provider_error_displays_provider_message() {
        let err = AdapterError::Provider {
            status: 429,
            message: "Rate limit reached".to_owned(),
        };
        assert_eq!(err.to_string(), "Rate limit reached");

        let err = AdapterError::Timeout {
            after: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "provider request timed out after 60s");
    }
}
