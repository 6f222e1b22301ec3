use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::news::models::{DateWindow, NewsArticle};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub window: DateWindow,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Serialize)]
pub struct NewsListResponse {
    pub articles: Vec<NewsArticle>,
    pub total: usize,
}

/// GET /api/news
pub async fn handle_list_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> Result<Json<NewsListResponse>, AppError> {
    let mut articles = state.news.get(params.window, params.refresh).await;

    if let Some(category) = params.category.as_deref().filter(|c| *c != "All") {
        articles.retain(|a| a.category.label() == category);
    }

    let total = articles.len();
    Ok(Json(NewsListResponse { articles, total }))
}

/// GET /api/news/featured
pub async fn handle_featured_article(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> Result<Json<NewsArticle>, AppError> {
    state
        .news
        .featured(params.window)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No articles available".to_string()))
}
