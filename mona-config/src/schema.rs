//! Strongly typed configuration schema.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::loader::{ConfigError, ConfigResult};

/// Provider settings (`openai:` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Chat model identifier.
    pub model: String,
    /// Output token budget per request.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Provider base URL.
    pub base_url: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            model: defaults::MODEL.to_owned(),
            max_tokens: defaults::MAX_TOKENS,
            temperature: defaults::TEMPERATURE,
            timeout: defaults::TIMEOUT_SECS,
            base_url: defaults::BASE_URL.to_owned(),
        }
    }
}

impl OpenAiSettings {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the model is blank, the token
    /// budget or timeout is zero, or the temperature is outside `0.0..=2.0`.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("openai.model must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "openai.max_tokens must be greater than zero",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(
                "openai.temperature must be between 0 and 2",
            ));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Invalid(
                "openai.timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider settings.
    pub openai: OpenAiSettings,
    /// Persona sent as the system message of every request.
    pub system_prompt: String,
    /// Template for the `informations_ia` field.
    pub user_prompt_template: String,
    /// Template for the `ce_quil_faut_voir` field.
    pub ce_quil_faut_voir_template: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai: OpenAiSettings::default(),
            system_prompt: defaults::SYSTEM_PROMPT.to_owned(),
            user_prompt_template: defaults::USER_PROMPT_TEMPLATE.to_owned(),
            ce_quil_faut_voir_template: defaults::CE_QUIL_FAUT_VOIR_TEMPLATE.to_owned(),
        }
    }
}

impl AppConfig {
    /// Parses a YAML document; keys it omits keep their defaults.
    ///
    /// An empty document yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] when the text is not valid YAML or a key
    /// has the wrong type, and [`ConfigError::Invalid`] when validation fails.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str::<Self>(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on inconsistent provider settings.
    pub fn validate(&self) -> ConfigResult<()> {
        self.openai.validate()
    }
}
