use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{MethodRouter, get};
use axum::{Json, Router};
use mona_catalogue::EnrichmentField;
use mona_service::{ArtworkInfoService, CachedInfo, GeneratedInfo};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::ApiError;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    service: Arc<ArtworkInfoService>,
}

impl AppState {
    /// Wraps the enrichment service for the router.
    #[must_use]
    pub fn new(service: Arc<ArtworkInfoService>) -> Self {
        Self { service }
    }
}

/// Directories holding the static site.
#[derive(Clone, Debug)]
pub struct StaticAssets {
    /// Front-end files; `index.html` is served at `/`.
    pub site: PathBuf,
    /// Artwork images, served under `/images`.
    pub images: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ManualUpdate {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ManualUpdateAck {
    success: bool,
    message: String,
}

/// Builds the application router.
pub fn router(state: AppState, assets: &StaticAssets) -> Router {
    Router::new()
        .route(
            "/api/artwork/{id}/ai-info",
            field_routes(EnrichmentField::Informations),
        )
        .route(
            "/api/artwork/{id}/ce-quil-faut-voir",
            field_routes(EnrichmentField::CeQuilFautVoir),
        )
        .with_state(state)
        .route_service("/", ServeFile::new(assets.site.join("index.html")))
        .nest_service("/images", ServeDir::new(&assets.images))
        .fallback_service(ServeDir::new(&assets.site))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn field_routes(field: EnrichmentField) -> MethodRouter<AppState> {
    get(move |state: State<AppState>, id: Path<String>| fetch(state, id, field))
        .post(move |state: State<AppState>, id: Path<String>| generate(state, id, field))
        .put(
            move |state: State<AppState>,
                  id: Path<String>,
                  body: Result<Json<ManualUpdate>, JsonRejection>| {
                update(state, id, field, body)
            },
        )
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    field: EnrichmentField,
) -> Result<Json<CachedInfo>, ApiError> {
    Ok(Json(state.service.get(field, &id).await?))
}

async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    field: EnrichmentField,
) -> Result<Json<GeneratedInfo>, ApiError> {
    Ok(Json(state.service.generate(field, &id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    field: EnrichmentField,
    body: Result<Json<ManualUpdate>, JsonRejection>,
) -> Result<Json<ManualUpdateAck>, ApiError> {
    // An unreadable body is treated as a missing `content`, so unknown ids
    // still answer 404 first.
    let update = body.map(|Json(update)| update).unwrap_or_else(|rejection| {
        debug!(artwork = %id, %field, error = %rejection, "unusable update body");
        ManualUpdate::default()
    });

    state.service.set_manual(field, &id, update.content).await?;
    Ok(Json(ManualUpdateAck {
        success: true,
        message: format!("{field} updated"),
    }))
}
