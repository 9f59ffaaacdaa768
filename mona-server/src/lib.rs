//! HTTP surface of the artwork catalogue.
//!
//! [`router`] exposes the enrichment endpoints of
//! [`ArtworkInfoService`](mona_service::ArtworkInfoService) under
//! `/api/artwork/{id}/...` and serves the static site for every other path.

#![warn(missing_docs, clippy::pedantic)]

pub mod cli;
mod error;
mod routes;

pub use error::ApiError;
pub use routes::{AppState, StaticAssets, router};
