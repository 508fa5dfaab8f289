use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use agromitra::config::{AppConfig, StoryBackend};
use agromitra::db::{Database, DbConfig};
use agromitra::disease::load_classifier;
use agromitra::llm::create_provider;
use agromitra::routes::configure_routes;
use agromitra::state::AppState;
use agromitra::stories::{MemoryStore, PgStoryStore, StoryStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "AgroMitra failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let db = Database::connect(DbConfig::from_url(
        &config.database_url,
        config.database_pool_size,
    )?)
    .await?;
    db.ensure_schema().await?;

    let provider = match create_provider(&config.ai).await {
        Ok(provider) => provider,
        Err(e) => {
            warn!(error = %e, "AI provider unavailable, using rule-based answers");
            None
        }
    };
    match &provider {
        Some(p) => info!(provider = p.name(), "AI features enabled"),
        None => info!("AI features disabled"),
    }

    let classifier = load_classifier(
        &config.disease_model_path,
        config.disease_model_url.as_deref(),
    )
    .await;

    let stories: Arc<dyn StoryStore> = match config.story_backend {
        StoryBackend::Memory => Arc::new(MemoryStore::seeded()),
        StoryBackend::Postgres => {
            let store = PgStoryStore::new(db.pool().clone());
            store.seed_if_empty().await?;
            Arc::new(store)
        }
    };

    let addr = config.bind_addr();
    let state = AppState::new(config, db, stories, classifier, provider).shared();
    let routes = configure_routes(state);

    info!(%addr, "Starting AgroMitra server");
    warp::serve(routes).run(addr).await;
    Ok(())
}
