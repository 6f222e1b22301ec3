//! Static source table and the Smart Cities keyword filter.

pub struct NewsSource {
    pub name: &'static str,
    pub feed_url: &'static str,
}

/// RSS feeds swept on every refresh, in priority order. All go through the
/// rss2json proxy since the upstream feeds are XML.
pub const RSS_SOURCES: [NewsSource; 2] = [
    NewsSource {
        name: "Times of India",
        feed_url: "https://timesofindia.indiatimes.com/rssfeeds/-2128833038.cms",
    },
    NewsSource {
        name: "Times of India - Technology",
        feed_url: "https://timesofindia.indiatimes.com/rssfeeds/5880659.cms",
    },
];

/// Keywords that mark an item as Smart Cities related. Lowercase; matched
/// against lowercased title + description.
pub const SMART_CITY_KEYWORDS: [&str; 16] = [
    "smart city",
    "urban development",
    "urban planning",
    "smart mobility",
    "public transit",
    "traffic management",
    "city infrastructure",
    "sustainable city",
    "urban technology",
    "iot city",
    "digital city",
    "city data",
    "urban analytics",
    "municipal",
    "civic tech",
    "urban innovation",
];

pub fn matches_smart_city_keywords(text: &str) -> bool {
    let text = text.to_lowercase();
    SMART_CITY_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}
