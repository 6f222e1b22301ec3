pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers::handle_chat;
use crate::news::handlers::{handle_featured_article, handle_list_news};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/chat", post(handle_chat))
        .route("/api/news", get(handle_list_news))
        .route("/api/news/featured", get(handle_featured_article))
        .with_state(state)
}
