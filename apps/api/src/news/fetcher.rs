//! Multi-source news fetching: RSS feeds through the rss2json proxy, plus
//! NewsAPI when a key is configured. A failing source is logged and
//! contributes nothing; the sweep itself only fails if the whole fetcher is
//! broken (which a scripted test fetcher can simulate).

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::news::models::{DateWindow, FetchedItem};
use crate::news::sources::{matches_smart_city_keywords, RSS_SOURCES, SMART_CITY_KEYWORDS};

const RSS_PROXY_URL: &str = "https://api.rss2json.com/v1/api.json";
const NEWSAPI_URL: &str = "https://newsapi.org/v2/everything";
const NEWSAPI_PAGE_SIZE: u32 = 20;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected payload from {feed}: {detail}")]
    Malformed { feed: String, detail: String },
}

/// News backend abstraction. The production implementation sweeps RSS and
/// NewsAPI; tests substitute a scripted fetcher.
#[async_trait]
pub trait NewsFetcher: Send + Sync {
    async fn fetch(&self, window: DateWindow) -> Result<Vec<FetchedItem>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct RssProxyResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
    #[serde(default, rename = "pubDate")]
    pub_date: String,
    thumbnail: Option<String>,
    enclosure: Option<RssEnclosure>,
}

#[derive(Debug, Deserialize)]
struct RssEnclosure {
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<NewsApiSource>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

/// Production fetcher. Owns its HTTP client; the NewsAPI source is skipped
/// entirely when no key is configured (RSS needs none).
pub struct HttpNewsFetcher {
    client: Client,
    news_api_key: Option<String>,
}

impl HttpNewsFetcher {
    pub fn new(news_api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            news_api_key,
        }
    }

    async fn fetch_rss(
        &self,
        feed_url: &str,
        source_name: &str,
    ) -> Result<Vec<FetchedItem>, FetchError> {
        let response = self
            .client
            .get(RSS_PROXY_URL)
            .query(&[("rss_url", feed_url)])
            .send()
            .await?
            .error_for_status()?;

        let feed: RssProxyResponse = response.json().await?;
        if feed.status != "ok" {
            return Err(FetchError::Malformed {
                feed: source_name.to_string(),
                detail: format!("proxy status {:?}", feed.status),
            });
        }

        let items = feed
            .items
            .into_iter()
            .filter(|item| {
                matches_smart_city_keywords(&format!("{} {}", item.title, item.description))
            })
            .map(|item| {
                let image_url = item
                    .enclosure
                    .and_then(|e| e.link)
                    .or(item.thumbnail)
                    .filter(|u| !u.is_empty());
                FetchedItem {
                    title: if item.title.is_empty() {
                        "Untitled".to_string()
                    } else {
                        item.title
                    },
                    description: item.description,
                    url: item.link,
                    published: parse_published(&item.pub_date),
                    source: source_name.to_string(),
                    image_url,
                }
            })
            .collect();

        Ok(items)
    }

    async fn fetch_newsapi(&self, api_key: &str) -> Result<Vec<FetchedItem>, FetchError> {
        let query = SMART_CITY_KEYWORDS[..3].join(" OR ");
        let page_size = NEWSAPI_PAGE_SIZE.to_string();

        let response = self
            .client
            .get(NEWSAPI_URL)
            .query(&[
                ("q", query.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: NewsApiResponse = response.json().await?;
        if payload.status != "ok" {
            return Err(FetchError::Malformed {
                feed: "NewsAPI".to_string(),
                detail: format!("status {:?}", payload.status),
            });
        }

        let items = payload
            .articles
            .into_iter()
            .filter_map(|article| {
                let title = article.title?;
                let url = article.url?;
                Some(FetchedItem {
                    title,
                    description: article.description.unwrap_or_default(),
                    url,
                    published: article
                        .published_at
                        .as_deref()
                        .map(parse_published)
                        .unwrap_or_else(Utc::now),
                    source: article
                        .source
                        .and_then(|s| s.name)
                        .unwrap_or_else(|| "NewsAPI".to_string()),
                    image_url: article.url_to_image.filter(|u| !u.is_empty()),
                })
            })
            .collect();

        Ok(items)
    }
}

#[async_trait]
impl NewsFetcher for HttpNewsFetcher {
    async fn fetch(&self, window: DateWindow) -> Result<Vec<FetchedItem>, FetchError> {
        let mut items = Vec::new();

        for source in &RSS_SOURCES {
            match self.fetch_rss(source.feed_url, source.name).await {
                Ok(mut fetched) => items.append(&mut fetched),
                Err(e) => warn!(source = source.name, error = %e, "RSS source failed, skipping"),
            }
        }

        if let Some(key) = &self.news_api_key {
            match self.fetch_newsapi(key).await {
                Ok(mut fetched) => items.append(&mut fetched),
                Err(e) => warn!(error = %e, "NewsAPI fetch failed, skipping"),
            }
        }

        Ok(postprocess(items, window, Utc::now()))
    }
}

/// Window filter, URL dedup (first occurrence wins — sources are swept in
/// priority order), newest-first sort.
pub fn postprocess(
    items: Vec<FetchedItem>,
    window: DateWindow,
    now: DateTime<Utc>,
) -> Vec<FetchedItem> {
    let cutoff = now - Duration::days(window.days());
    let mut seen = HashSet::new();

    let mut kept: Vec<FetchedItem> = items
        .into_iter()
        .filter(|item| item.published >= cutoff)
        .filter(|item| seen.insert(item.url.clone()))
        .collect();

    kept.sort_by(|a, b| b.published.cmp(&a.published));
    kept
}

/// Parses the publication timestamps seen in the wild: RFC 2822 from RSS,
/// RFC 3339 from NewsAPI, and rss2json's bare "YYYY-MM-DD HH:MM:SS".
/// Unparseable values fall back to now rather than dropping the item.
fn parse_published(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }

    Utc::now()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Scripted `NewsFetcher` double: outcomes consumed in order, calls
    /// counted. Once the script runs dry it keeps returning an empty sweep.
    pub struct ScriptedFetcher {
        outcomes: Mutex<VecDeque<Result<Vec<FetchedItem>, FetchError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        pub fn new(outcomes: Vec<Result<Vec<FetchedItem>, FetchError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn empty() -> Self {
            Self::new(Vec::new())
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NewsFetcher for ScriptedFetcher {
        async fn fetch(&self, _window: DateWindow) -> Result<Vec<FetchedItem>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    pub fn item(url: &str, published: DateTime<Utc>) -> FetchedItem {
        FetchedItem {
            title: format!("Article at {url}"),
            description: "smart city pilot program".to_string(),
            url: url.to_string(),
            published,
            source: "Test Wire".to_string(),
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::test_support::item;
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_postprocess_drops_items_outside_window() {
        let items = vec![
            item("https://a.example/1", now() - Duration::days(2)),
            item("https://a.example/2", now() - Duration::days(10)),
        ];

        let kept = postprocess(items, DateWindow::Latest, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "https://a.example/1");
    }

    #[test]
    fn test_postprocess_wider_window_keeps_older_items() {
        let items = vec![
            item("https://a.example/1", now() - Duration::days(10)),
            item("https://a.example/2", now() - Duration::days(40)),
        ];

        let kept = postprocess(items, DateWindow::Past30days, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "https://a.example/1");
    }

    #[test]
    fn test_postprocess_dedups_by_url_first_wins() {
        let mut first = item("https://a.example/dup", now() - Duration::days(1));
        first.source = "Primary".to_string();
        let mut second = item("https://a.example/dup", now() - Duration::days(1));
        second.source = "Secondary".to_string();

        let kept = postprocess(vec![first, second], DateWindow::Latest, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source, "Primary");
    }

    #[test]
    fn test_postprocess_sorts_newest_first() {
        let items = vec![
            item("https://a.example/old", now() - Duration::days(5)),
            item("https://a.example/new", now() - Duration::days(1)),
            item("https://a.example/mid", now() - Duration::days(3)),
        ];

        let kept = postprocess(items, DateWindow::Latest, now());
        let urls: Vec<&str> = kept.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://a.example/new",
                "https://a.example/mid",
                "https://a.example/old"
            ]
        );
    }

    #[test]
    fn test_parse_published_rfc2822() {
        let parsed = parse_published("Sun, 15 Jun 2025 10:30:00 +0530");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 15, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_published_rfc3339() {
        let parsed = parse_published("2025-06-15T10:30:00Z");
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_published_bare_datetime() {
        let parsed = parse_published("2025-06-15 10:30:00");
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap()
        );
    }
}
