//! Configuration management for the artwork server.
//!
//! Settings come from a YAML file (`ai_config.yaml` by default). Every key is
//! optional: a missing key takes its built-in default, and a missing file
//! yields the full default configuration.

#![warn(missing_docs, clippy::pedantic)]

pub mod defaults;
pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigResult, ConfigSource, LoadedConfig, load_or_default};
pub use schema::{AppConfig, OpenAiSettings};
