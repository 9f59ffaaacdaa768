//! Artwork enrichment service.
//!
//! Serves the two enrichment fields of an artwork from the catalogue when
//! present, generates them through a [`TextGenerator`](mona_adapters::traits::TextGenerator)
//! on request, and writes results back through a
//! [`CatalogueStore`](mona_catalogue::CatalogueStore).

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod service;

pub use error::{InfoError, InfoResult};
pub use service::{ArtworkInfoService, CachedInfo, GeneratedInfo, GenerationSettings};
