//! Prompt construction for artwork enrichment.
//!
//! [`PromptTemplate`] parses the `{name}` placeholder syntax used in the
//! configuration file; [`ArtworkPrompts`] binds the two enrichment templates
//! to artwork fields and validates them up front.

#![warn(missing_docs, clippy::pedantic)]

mod artwork;
mod template;

pub use artwork::{ArtworkPrompts, ChatPrompt, CE_QUIL_FAUT_VOIR_VARIABLES, INFORMATIONS_VARIABLES};
pub use template::{PromptTemplate, TemplateError, TemplateResult};
