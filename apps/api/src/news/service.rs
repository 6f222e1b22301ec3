//! News service — a TTL cache over the fetcher, one slot per date window.
//!
//! Both the fetcher and the cache arrive through the constructor, so
//! lifecycle and test isolation are explicit rather than ambient.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::news::enrich::into_article;
use crate::news::fetcher::NewsFetcher;
use crate::news::models::{DateWindow, NewsArticle};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

struct CacheSlot {
    articles: Vec<NewsArticle>,
    fetched_at: Instant,
}

impl CacheSlot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        !self.articles.is_empty() && self.fetched_at.elapsed() < ttl
    }
}

pub struct NewsService {
    fetcher: Arc<dyn NewsFetcher>,
    ttl: Duration,
    slots: RwLock<HashMap<DateWindow, CacheSlot>>,
}

impl NewsService {
    pub fn new(fetcher: Arc<dyn NewsFetcher>) -> Self {
        Self::with_ttl(fetcher, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(fetcher: Arc<dyn NewsFetcher>, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Returns articles for the window, refreshing when the slot is
    /// missing, empty, expired, or `force` is set. A failed refresh serves
    /// whatever the slot already holds (stale-on-error).
    pub async fn get(&self, window: DateWindow, force: bool) -> Vec<NewsArticle> {
        if !force {
            let slots = self.slots.read().await;
            if let Some(slot) = slots.get(&window) {
                if slot.is_fresh(self.ttl) {
                    return slot.articles.clone();
                }
            }
        }

        // Refreshes serialize on the write lock, so concurrent requests for
        // an expired window do not issue duplicate sweeps.
        let mut slots = self.slots.write().await;
        if !force {
            if let Some(slot) = slots.get(&window) {
                if slot.is_fresh(self.ttl) {
                    return slot.articles.clone();
                }
            }
        }

        match self.fetcher.fetch(window).await {
            Ok(items) => {
                let articles: Vec<NewsArticle> = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| into_article(item, i))
                    .collect();
                debug!(?window, count = articles.len(), "news cache refreshed");
                slots.insert(
                    window,
                    CacheSlot {
                        articles: articles.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                articles
            }
            Err(e) => {
                warn!(?window, error = %e, "news refresh failed, serving cached articles");
                slots
                    .get(&window)
                    .map(|slot| slot.articles.clone())
                    .unwrap_or_default()
            }
        }
    }

    /// Most recent article for the window, if any.
    pub async fn featured(&self, window: DateWindow) -> Option<NewsArticle> {
        self.get(window, false).await.into_iter().next()
    }
}
