use std::sync::Arc;

use crate::config::Config;
use crate::news::service::NewsService;
use crate::upstream::GenerativeClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Generative backend behind a trait so tests can script outcomes.
    pub generative: Arc<dyn GenerativeClient>,
    pub news: Arc<NewsService>,
}
