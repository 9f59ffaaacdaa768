//! Artwork catalogue persistence.
//!
//! The catalogue is a single JSON document mapping museum names to lists of
//! artwork records. [`JsonFileStore`] reads and rewrites it whole, keeping a
//! `.backup` copy of the previous content on every save.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod model;
mod store;

pub use error::{CatalogueError, CatalogueResult};
pub use model::{Artwork, ArtworkBuilder, Catalogue, EnrichmentField};
pub use store::{CatalogueStore, JsonFileStore};
