mod chat;
mod config;
mod errors;
mod news;
mod routes;
mod state;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::news::fetcher::HttpNewsFetcher;
use crate::news::service::NewsService;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upstream::{GeminiClient, GenerativeClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_name, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting InsightEdge API v{}", env!("CARGO_PKG_VERSION"));

    if !config.has_gemini_key() {
        warn!("GEMINI_API_KEY not configured; /api/chat will report an error until it is set");
    }

    // Initialize the generative backend
    let generative: Arc<dyn GenerativeClient> = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone().unwrap_or_default(),
    ));
    info!(
        "Gemini client initialized (candidates: {:?})",
        chat::MODEL_CANDIDATES
    );

    // Initialize the news service
    let fetcher = Arc::new(HttpNewsFetcher::new(config.news_api_key.clone()));
    let news = Arc::new(NewsService::new(fetcher));
    info!("News service initialized");

    // Build app state
    let state = AppState {
        config: config.clone(),
        generative,
        news,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
