//! `OpenAI` chat-completion adapter.

use std::{env, fmt, time::Duration};

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Request, StatusCode, Uri};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::http_client::{HyperClient, build_https_client};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, GenerationRequest, PromptMessage, TextGenerator,
};

/// Environment variable holding the API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Base URL of the public API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/";

/// Configuration for the `OpenAI` adapter.
#[derive(Clone)]
pub struct OpenAiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    default_temperature: Option<f32>,
    default_max_tokens: Option<u32>,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenAiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(60),
            default_temperature: None,
            default_max_tokens: None,
        }
    }

    /// Loads the API key from the `OPENAI_API_KEY` environment variable.
    ///
    /// An empty value counts as unset.
    #[must_use]
    pub fn from_env(model: impl Into<String>) -> Self {
        let mut cfg = Self::new(model);
        cfg.api_key = env::var(OPENAI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        cfg
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the default sampling temperature used when requests omit it.
    #[must_use]
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = Some(temperature);
        self
    }

    /// Sets the default output token budget used when requests omit it.
    #[must_use]
    pub fn with_default_max_tokens(mut self, tokens: u32) -> Self {
        self.default_max_tokens = Some(tokens);
        self
    }

    /// Sets the request timeout used when requests omit it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Returns `true` when an API key is available.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Adapter that calls the chat-completion endpoint over HTTP(S).
pub struct OpenAiAdapter {
    client: HyperClient,
    endpoint: Uri,
    metadata: AdapterMetadata,
    api_key: String,
    timeout: Duration,
    default_temperature: Option<f32>,
    default_max_tokens: Option<u32>,
}

impl fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the API key is missing or the
    /// endpoint cannot be formed.
    pub fn new(config: OpenAiConfig) -> AdapterResult<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| AdapterError::configuration("OpenAI adapter requires an API key"))?;

        let metadata = AdapterMetadata::new("openai", config.model);
        let endpoint = format!("{}v1/chat/completions", config.base_url)
            .parse::<Uri>()
            .map_err(|err| {
                AdapterError::configuration(format!("invalid OpenAI endpoint: {err}"))
            })?;

        Ok(Self {
            client: build_https_client(),
            endpoint,
            metadata,
            api_key,
            timeout: config.timeout,
            default_temperature: config.default_temperature,
            default_max_tokens: config.default_max_tokens,
        })
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        let messages = request.messages().iter().map(map_prompt_message).collect();

        ChatCompletionRequest {
            model: request
                .model()
                .unwrap_or_else(|| self.metadata.model())
                .to_owned(),
            messages,
            temperature: request.temperature().or(self.default_temperature),
            max_tokens: request.max_output_tokens().or(self.default_max_tokens),
            stream: false,
        }
    }

    async fn send(&self, body: Vec<u8>) -> AdapterResult<(StatusCode, hyper::body::Bytes)> {
        let request = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .body(Body::from(body))
            .map_err(|err| {
                AdapterError::invalid_request(format!("failed to build OpenAI request: {err}"))
            })?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|err| AdapterError::connection(format!("OpenAI request failed: {err}")))?;

        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.map_err(|err| {
            AdapterError::connection(format!("failed to read OpenAI response: {err}"))
        })?;
        Ok((status, bytes))
    }
}

#[async_trait]
impl TextGenerator for OpenAiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn generate(&self, request: GenerationRequest) -> AdapterResult<String> {
        let payload = self.build_request(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode OpenAI request: {err}"))
        })?;

        let limit = request.timeout().unwrap_or(self.timeout);
        debug!(model = %payload.model, timeout_secs = limit.as_secs(), "calling OpenAI");

        let (status, bytes) = timeout(limit, self.send(body))
            .await
            .map_err(|_| AdapterError::Timeout { after: limit })??;

        if !status.is_success() {
            let message = provider_error_message(status, &bytes);
            warn!(status = status.as_u16(), %message, "OpenAI returned an error");
            return Err(AdapterError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        extract_content(&bytes)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn map_prompt_message(message: &PromptMessage) -> OpenAiMessage {
    OpenAiMessage {
        role: message.role().to_string(),
        content: message.content().to_owned(),
    }
}

/// Uses `error.message` from the body when present, else names the status.
fn provider_error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .unwrap_or_else(|| format!("provider returned status {}", status.as_u16()))
}

/// Returns the first choice's message text.
fn extract_content(body: &[u8]) -> AdapterResult<String> {
    let response: ChatCompletionResponse = serde_json::from_slice(body)
        .map_err(|err| AdapterError::unexpected(format!("failed to decode OpenAI response: {err}")))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| AdapterError::unexpected("response has no message content in first choice"))
}

fn sanitize_base_url(input: &str) -> AdapterResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AdapterError::configuration(
            "OpenAI base URL must start with http:// or https://",
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid OpenAI base URL: {err}")))?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MessageRole;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn spawn_provider(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn adapter_for(base_url: &str) -> OpenAiAdapter {
        let config = OpenAiConfig::new("gpt-4o-mini")
            .with_api_key("test_key")
            .with_base_url(base_url)
            .unwrap();
        OpenAiAdapter::new(config).unwrap()
    }

    async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        Json(json!({
            "choices": [{
                "message": {
                    "content": format!(
                        "{}|{}|{}|{}",
                        body["model"].as_str().unwrap_or_default(),
                        body["messages"][1]["content"].as_str().unwrap_or_default(),
                        body["max_tokens"],
                        auth
                    )
                }
            }]
        }))
    }

    async fn fixed(
        State((status, body)): State<(AxumStatus, &'static str)>,
    ) -> (AxumStatus, &'static str) {
        (status, body)
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = OpenAiConfig::new("gpt-4")
            .with_base_url("api.openai.com")
            .expect_err("missing scheme should error");

        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn sanitize_allows_trailing_slash() {
        let cfg = OpenAiConfig::new("gpt-4")
            .with_base_url("https://example.com/openai")
            .expect("valid URL");
        assert_eq!(cfg.base_url, "https://example.com/openai/");
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = OpenAiAdapter::new(OpenAiConfig::new("gpt-4o-mini")).unwrap_err();
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = OpenAiConfig::new("gpt-4o-mini").with_api_key("sk-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(config.has_api_key());
    }

    #[test]
    fn prompt_mapping_preserves_role() {
        let message = PromptMessage::new(MessageRole::User, "hello");
        let mapped = map_prompt_message(&message);
        assert_eq!(mapped.role, "user");
        assert_eq!(mapped.content, "hello");
    }

    #[test]
    fn build_request_applies_defaults_and_overrides() {
        let config = OpenAiConfig::new("gpt-4o-mini")
            .with_default_temperature(0.2)
            .with_default_max_tokens(2000)
            .with_api_key("test_key");
        let adapter = OpenAiAdapter::new(config).expect("adapter");

        let chat = adapter.build_request(&GenerationRequest::chat("system", "hello"));
        assert_eq!(chat.model, "gpt-4o-mini");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.temperature, Some(0.2));
        assert_eq!(chat.max_tokens, Some(2000));

        let chat = adapter.build_request(
            &GenerationRequest::chat("system", "hello")
                .with_model("gpt-4o")
                .with_temperature(0.9)
                .with_max_output_tokens(10),
        );
        assert_eq!(chat.model, "gpt-4o");
        assert_eq!(chat.temperature, Some(0.9));
        assert_eq!(chat.max_tokens, Some(10));
    }

    #[test]
    fn error_message_prefers_provider_text() {
        let body = br#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            provider_error_message(StatusCode::UNAUTHORIZED, body),
            "Incorrect API key provided"
        );
        assert_eq!(
            provider_error_message(StatusCode::BAD_GATEWAY, b""),
            "provider returned status 502"
        );
        assert_eq!(
            provider_error_message(StatusCode::BAD_REQUEST, br#"{"error": {}}"#),
            "provider returned status 400"
        );
    }

    #[test]
    fn extract_content_takes_first_choice() {
        let json = br#"{"choices": [{"message": {"content": "premier"}}, {"message": {"content": "second"}}]}"#;
        assert_eq!(extract_content(json).unwrap(), "premier");

        let bodies: [&[u8]; 3] = [br#"{"choices": []}"#, br#"{"choices": [{}]}"#, b"not json"];
        for body in bodies {
            let err = extract_content(body).unwrap_err();
            assert!(matches!(err, AdapterError::UnexpectedResponse { .. }));
        }
    }

    #[tokio::test]
    async fn generate_posts_chat_completion() {
        let base = spawn_provider(Router::new().route("/v1/chat/completions", post(echo))).await;
        let adapter = adapter_for(&base);

        let text = adapter
            .generate(GenerationRequest::chat("persona", "Parle-moi de la Joconde").with_max_output_tokens(42))
            .await
            .unwrap();

        assert_eq!(text, "gpt-4o-mini|Parle-moi de la Joconde|42|Bearer test_key");
    }

    #[tokio::test]
    async fn non_success_status_is_forwarded() {
        let router = Router::new()
            .route("/v1/chat/completions", post(fixed))
            .with_state((
                AxumStatus::TOO_MANY_REQUESTS,
                r#"{"error": {"message": "Rate limit reached"}}"#,
            ));
        let adapter = adapter_for(&spawn_provider(router).await);

        let err = adapter
            .generate(GenerationRequest::chat("s", "u"))
            .await
            .unwrap_err();
        match err {
            AdapterError::Provider { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_is_unexpected_response() {
        let router = Router::new()
            .route("/v1/chat/completions", post(fixed))
            .with_state((AxumStatus::OK, r#"{"choices": []}"#));
        let adapter = adapter_for(&spawn_provider(router).await);

        let err = adapter
            .generate(GenerationRequest::chat("s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::UnexpectedResponse { .. }));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let adapter = adapter_for(&spawn_provider(router).await);

        let err = adapter
            .generate(GenerationRequest::chat("s", "u").with_timeout(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Timeout { after } if after == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn refused_connection_is_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let adapter = adapter_for(&format!("http://{addr}/"));
        let err = adapter
            .generate(GenerationRequest::chat("s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Connection { .. }));
    }
}
