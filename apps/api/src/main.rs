mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod recommendations;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::recommendations::pipeline::RecommendationPipeline;
use crate::recommendations::store::PgProfileStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.model_endpoint.clone(),
        config.model_api_key.clone(),
        config.model_deployment.clone(),
    )?;
    info!("LLM client initialized (deployment: {})", llm.deployment());

    let params = config.invocation_params();
    info!(
        "Model budget: {}ms, max_tokens={}, temperature={}",
        params.timeout.as_millis(),
        params.max_tokens,
        params.temperature
    );

    // Build app state
    let state = AppState {
        pipeline: RecommendationPipeline::new(
            Arc::new(PgProfileStore::new(db)),
            Arc::new(llm),
            params,
        ),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
