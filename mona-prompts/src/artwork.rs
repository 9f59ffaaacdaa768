//! Binds enrichment templates to artwork records.

use std::collections::HashMap;

use mona_catalogue::{Artwork, EnrichmentField};
use tracing::debug;

use crate::template::{PromptTemplate, TemplateResult};

/// Variables available to the `informations_ia` template.
pub const INFORMATIONS_VARIABLES: &[&str] = &["titre", "artiste", "date", "musee", "techniques"];

/// Variables available to the `ce_quil_faut_voir` template.
pub const CE_QUIL_FAUT_VOIR_VARIABLES: &[&str] = &["titre", "artiste", "date", "musee"];

/// System and user messages ready to send to a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatPrompt {
    /// Persona instruction shared by every request.
    pub system: String,
    /// Artwork-specific request text.
    pub user: String,
}

/// Validated prompt set for both enrichment fields.
#[derive(Clone, Debug)]
pub struct ArtworkPrompts {
    system_prompt: String,
    informations: PromptTemplate,
    ce_quil_faut_voir: PromptTemplate,
}

impl ArtworkPrompts {
    /// Parses both templates and checks that each only references variables
    /// its field provides.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`](crate::TemplateError) when a template is
    /// malformed or references an unknown variable.
    pub fn new(
        system_prompt: impl Into<String>,
        informations_template: &str,
        ce_quil_faut_voir_template: &str,
    ) -> TemplateResult<Self> {
        let informations = PromptTemplate::parse(informations_template)?;
        informations.ensure_provided(INFORMATIONS_VARIABLES)?;

        let ce_quil_faut_voir = PromptTemplate::parse(ce_quil_faut_voir_template)?;
        ce_quil_faut_voir.ensure_provided(CE_QUIL_FAUT_VOIR_VARIABLES)?;

        Ok(Self {
            system_prompt: system_prompt.into(),
            informations,
            ce_quil_faut_voir,
        })
    }

    /// Returns the template used for `field`.
    #[must_use]
    pub fn template(&self, field: EnrichmentField) -> &PromptTemplate {
        match field {
            EnrichmentField::Informations => &self.informations,
            EnrichmentField::CeQuilFautVoir => &self.ce_quil_faut_voir,
        }
    }

    /// Builds the messages requesting `field` for `artwork`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`](crate::TemplateError::MissingVariable)
    /// if the template needs a variable the field does not supply.
    pub fn prompt_for(&self, field: EnrichmentField, artwork: &Artwork) -> TemplateResult<ChatPrompt> {
        let user = self.template(field).render(&artwork_variables(field, artwork))?;
        debug!(artwork = artwork.id(), %field, chars = user.len(), "prompt rendered");
        Ok(ChatPrompt {
            system: self.system_prompt.clone(),
            user,
        })
    }
}

fn artwork_variables(field: EnrichmentField, artwork: &Artwork) -> HashMap<&'static str, String> {
    let text = |value: Option<&str>| value.unwrap_or_default().to_owned();

    let mut vars = HashMap::from([
        ("titre", text(artwork.titre())),
        ("artiste", text(artwork.artiste())),
        ("date", artwork.date_text()),
        ("musee", text(artwork.musee())),
    ]);

    if field == EnrichmentField::Informations {
        let techniques = artwork.techniques();
        let line = if techniques.is_empty() {
            String::new()
        } else {
            format!("Techniques: {}", techniques.join(", "))
        };
        vars.insert("techniques", line);
    }

    vars
}
