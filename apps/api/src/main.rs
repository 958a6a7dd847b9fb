mod career;
mod config;
mod errors;
mod fallback;
mod index;
mod llm_client;
mod models;
mod ranking;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::career::{CareerAssistant, CareerSettings};
use crate::config::Config;
use crate::index::{HashEmbedder, IndexStore};
use crate::llm_client::{LlmClient, OpenRouterTransport, RetryPolicy};
use crate::ranking::{LlmRelevanceAnalyzer, Ranker};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the index store (content types load lazily on first use)
    let embedder = Arc::new(HashEmbedder::new(config.embedding_dimension));
    let store = Arc::new(IndexStore::new(&config.index_dir, embedder)?);

    // Initialize LLM client
    let transport = OpenRouterTransport::new(config.openrouter_api_key.clone(), config.llm_api_url.clone())?;
    let llm = LlmClient::new(
        Arc::new(transport),
        config.model_id.clone(),
        RetryPolicy::new(config.llm_max_retries),
    );
    info!("LLM client initialized (model: {})", llm.model());

    // Ranker and career assistant
    let ranker = Ranker::new(
        Arc::new(LlmRelevanceAnalyzer::new(llm.clone())),
        config.ranker_concurrency,
    );
    let settings = CareerSettings {
        public_base_url: config.public_base_url.clone(),
        max_similar_resumes: config.max_similar_resumes,
        legacy_index_file: config.legacy_index_file.clone(),
        legacy_corpus_file: config.legacy_corpus_file.clone(),
    };
    let assistant = CareerAssistant::new(store.clone(), llm, ranker, settings);

    // Build app state
    let state = AppState {
        store: store.clone(),
        assistant,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Writes are already persisted; this flushes once more before exit.
    let saved = store.save_all().await?;
    info!("Shutdown complete ({saved} content types saved)");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}
