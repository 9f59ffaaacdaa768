//! Text-generation provider adapters.
//!
//! [`traits::TextGenerator`] is the seam the artwork service depends on;
//! [`openai::OpenAiAdapter`] implements it against the chat-completion API.

#![warn(missing_docs, clippy::pedantic)]

pub mod openai;
pub mod traits;

mod http_client;
