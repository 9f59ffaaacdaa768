//! Cache-or-generate orchestration for enrichment fields.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use mona_adapters::traits::{GenerationRequest, TextGenerator};
use mona_catalogue::{CatalogueStore, EnrichmentField};
use mona_config::{AppConfig, OpenAiSettings};
use mona_prompts::ArtworkPrompts;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{InfoError, InfoResult};

/// Sampling parameters forwarded with every generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Chat model identifier.
    pub model: String,
    /// Output token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Provider timeout.
    pub timeout: Duration,
}

impl From<&OpenAiSettings> for GenerationSettings {
    fn from(settings: &OpenAiSettings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout: settings.timeout(),
        }
    }
}

/// Current value of an enrichment field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedInfo {
    /// Stored text, if any.
    pub content: Option<String>,
    /// Whether the text was already stored.
    pub cached: bool,
}

/// Outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedInfo {
    /// Generated text.
    pub content: String,
    /// Whether the text was written to the catalogue.
    pub saved: bool,
    /// Explanation when `saved` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Serves, generates and stores the enrichment fields of artworks.
///
/// Every write runs a full load, mutate and save cycle under one async mutex,
/// so concurrent updates to different artworks never overwrite each other.
/// Provider calls run outside that section.
pub struct ArtworkInfoService {
    store: Arc<dyn CatalogueStore>,
    generator: Option<Arc<dyn TextGenerator>>,
    prompts: ArtworkPrompts,
    settings: GenerationSettings,
    write_lock: Mutex<()>,
}

impl fmt::Debug for ArtworkInfoService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtworkInfoService")
            .field("generator", &self.generator.as_ref().map(|g| g.metadata().provider()))
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ArtworkInfoService {
    /// Creates the service from the process configuration.
    ///
    /// `generator` is `None` when no provider credential is available; reads
    /// and manual updates keep working, generation fails with
    /// [`InfoError::Unconfigured`].
    ///
    /// # Errors
    ///
    /// Returns [`InfoError::Template`] when a configured template is invalid.
    pub fn new(
        store: Arc<dyn CatalogueStore>,
        generator: Option<Arc<dyn TextGenerator>>,
        config: &AppConfig,
    ) -> InfoResult<Self> {
        let prompts = ArtworkPrompts::new(
            config.system_prompt.clone(),
            &config.user_prompt_template,
            &config.ce_quil_faut_voir_template,
        )?;

        Ok(Self {
            store,
            generator,
            prompts,
            settings: GenerationSettings::from(&config.openai),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns `true` when a generator is configured.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.generator.is_some()
    }

    /// Returns the stored value of `field` for artwork `id`.
    ///
    /// A stored `informations_ia` is served whatever its content, including
    /// an empty string. A `ce_quil_faut_voir` equal to `""` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`InfoError::NotFound`] for an unknown id and
    /// [`InfoError::CatalogueUnavailable`] when the catalogue cannot be read.
    pub async fn get(&self, field: EnrichmentField, id: &str) -> InfoResult<CachedInfo> {
        let catalogue = self.load().await?;
        let (_, artwork) = catalogue.find(id).ok_or_else(|| InfoError::not_found(id))?;

        let content = artwork
            .enrichment(field)
            .filter(|text| field == EnrichmentField::Informations || !text.is_empty())
            .map(str::to_owned);
        debug!(artwork = id, %field, cached = content.is_some(), "enrichment lookup");

        Ok(CachedInfo {
            cached: content.is_some(),
            content,
        })
    }

    /// Generates `field` for artwork `id` and stores the result.
    ///
    /// Always calls the provider, even when a value is already stored. A save
    /// failure does not discard the text: it is returned with `saved: false`
    /// and a warning.
    ///
    /// # Errors
    ///
    /// Returns [`InfoError::NotFound`], [`InfoError::Unconfigured`],
    /// [`InfoError::CatalogueUnavailable`], [`InfoError::Template`], or the
    /// provider failure mapped from the generator.
    pub async fn generate(&self, field: EnrichmentField, id: &str) -> InfoResult<GeneratedInfo> {
        let prompt = {
            let catalogue = self.load().await?;
            let (_, artwork) = catalogue.find(id).ok_or_else(|| InfoError::not_found(id))?;
            if self.generator.is_none() {
                return Err(InfoError::Unconfigured);
            }
            self.prompts.prompt_for(field, artwork)?
        };
        let generator = self.generator.as_ref().ok_or(InfoError::Unconfigured)?;

        let request = GenerationRequest::chat(prompt.system, prompt.user)
            .with_model(self.settings.model.clone())
            .with_max_output_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature)
            .with_timeout(self.settings.timeout);

        let content = generator.generate(request).await.map_err(|err| {
            warn!(artwork = id, %field, error = %err, "generation failed");
            InfoError::from(err)
        })?;

        match self.store_field(field, id, &content).await {
            Ok(()) => {
                info!(artwork = id, %field, chars = content.len(), "generated and saved");
                Ok(GeneratedInfo {
                    content,
                    saved: true,
                    warning: None,
                })
            }
            Err(err) => {
                warn!(artwork = id, %field, error = %err, "generated text could not be saved");
                Ok(GeneratedInfo {
                    content,
                    saved: false,
                    warning: Some(format!(
                        "the text was generated but could not be saved: {err}"
                    )),
                })
            }
        }
    }

    /// Overwrites `field` for artwork `id` with caller-supplied text.
    ///
    /// # Errors
    ///
    /// Returns [`InfoError::NotFound`] for an unknown id,
    /// [`InfoError::InvalidInput`] when `content` is missing or empty, and
    /// [`InfoError::Persistence`] when the save fails.
    pub async fn set_manual(
        &self,
        field: EnrichmentField,
        id: &str,
        content: Option<String>,
    ) -> InfoResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut catalogue = self.load().await?;
        let artwork = catalogue
            .find_mut(id)
            .ok_or_else(|| InfoError::not_found(id))?;

        let content = content
            .filter(|text| !text.is_empty())
            .ok_or_else(|| InfoError::invalid_input("the `content` field is required"))?;
        artwork.set_enrichment(field, content);

        self.store
            .save(&catalogue)
            .await
            .map_err(|source| InfoError::Persistence { source })?;
        info!(artwork = id, %field, "manual update saved");
        Ok(())
    }

    async fn store_field(&self, field: EnrichmentField, id: &str, content: &str) -> InfoResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut catalogue = self.load().await?;
        catalogue
            .find_mut(id)
            .ok_or_else(|| InfoError::not_found(id))?
            .set_enrichment(field, content);
        self.store
            .save(&catalogue)
            .await
            .map_err(|source| InfoError::Persistence { source })
    }

    async fn load(&self) -> InfoResult<mona_catalogue::Catalogue> {
        self.store.load().await.map_err(|source| {
            warn!(error = %source, "catalogue unavailable");
            InfoError::CatalogueUnavailable { source }
        })
    }
}
