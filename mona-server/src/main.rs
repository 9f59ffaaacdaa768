//! Les Yeux de Mona server binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mona_adapters::openai::{OPENAI_API_KEY_ENV, OpenAiAdapter, OpenAiConfig};
use mona_adapters::traits::TextGenerator;
use mona_catalogue::JsonFileStore;
use mona_config::{ConfigSource, OpenAiSettings, load_or_default};
use mona_server::cli::ServerArgs;
use mona_server::{AppState, router};
use mona_service::ArtworkInfoService;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();
    mona_telemetry::init_tracing(mona_telemetry::DEFAULT_FILTER)?;

    let args = ServerArgs::parse();
    let loaded = load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    match &loaded.source {
        ConfigSource::File(path) => info!(path = %path.display(), "configuration read from file"),
        ConfigSource::Defaults => info!("configuration uses built-in defaults"),
    }
    let config = loaded.config;

    let generator = build_generator(&config.openai)?;
    let store = Arc::new(JsonFileStore::new(&args.catalogue));
    let service = ArtworkInfoService::new(store, generator, &config)
        .context("building the artwork info service")?;

    info!(
        model = %config.openai.model,
        site = %args.site.display(),
        images = %args.images.display(),
        catalogue = %args.catalogue.display(),
        config = %args.config.display(),
        generation = service.can_generate(),
        "starting yeux-de-mona"
    );

    let app = router(AppState::new(Arc::new(service)), &args.assets());
    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %args.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

fn build_generator(settings: &OpenAiSettings) -> Result<Option<Arc<dyn TextGenerator>>> {
    let config = OpenAiConfig::from_env(settings.model.clone())
        .with_base_url(&settings.base_url)?
        .with_default_temperature(settings.temperature)
        .with_default_max_tokens(settings.max_tokens)
        .with_timeout(settings.timeout());

    if !config.has_api_key() {
        warn!("{OPENAI_API_KEY_ENV} is not set; generation endpoints will answer 500");
        return Ok(None);
    }

    let generator: Arc<dyn TextGenerator> = Arc::new(OpenAiAdapter::new(config)?);
    Ok(Some(generator))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}
