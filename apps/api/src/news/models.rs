use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content category assigned to every article. Serialized labels are part
/// of the wire contract with the frontend's category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsCategory {
    #[serde(rename = "Smart Cities")]
    SmartCities,
    #[serde(rename = "Urban Mobility")]
    UrbanMobility,
    #[serde(rename = "Infrastructure")]
    Infrastructure,
    #[serde(rename = "Sustainability")]
    Sustainability,
    #[serde(rename = "Governance & Policy")]
    GovernancePolicy,
    #[serde(rename = "Technology in Cities")]
    TechnologyInCities,
}

impl NewsCategory {
    pub fn label(&self) -> &'static str {
        match self {
            NewsCategory::SmartCities => "Smart Cities",
            NewsCategory::UrbanMobility => "Urban Mobility",
            NewsCategory::Infrastructure => "Infrastructure",
            NewsCategory::Sustainability => "Sustainability",
            NewsCategory::GovernancePolicy => "Governance & Policy",
            NewsCategory::TechnologyInCities => "Technology in Cities",
        }
    }
}

/// Smart City roles an article is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmartCityRole {
    #[serde(rename = "Urban Data Analyst")]
    UrbanDataAnalyst,
    #[serde(rename = "Smart Mobility Analyst")]
    SmartMobilityAnalyst,
    #[serde(rename = "City Operations Analyst")]
    CityOperationsAnalyst,
}

impl SmartCityRole {
    pub fn label(&self) -> &'static str {
        match self {
            SmartCityRole::UrbanDataAnalyst => "Urban Data Analyst",
            SmartCityRole::SmartMobilityAnalyst => "Smart Mobility Analyst",
            SmartCityRole::CityOperationsAnalyst => "City Operations Analyst",
        }
    }
}

/// Date window for news queries: `latest` covers the last 7 days,
/// `past30days` the last 30.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateWindow {
    #[default]
    Latest,
    Past30days,
}

impl DateWindow {
    pub fn days(&self) -> i64 {
        match self {
            DateWindow::Latest => 7,
            DateWindow::Past30days => 30,
        }
    }
}

/// A raw item as returned by a source, before enrichment.
#[derive(Debug, Clone)]
pub struct FetchedItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published: DateTime<Utc>,
    pub source: String,
    pub image_url: Option<String>,
}

/// A fully enriched article as served to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: NewsCategory,
    pub source: String,
    /// YYYY-MM-DD
    pub published_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub url: String,
    pub related_roles: Vec<SmartCityRole>,
    pub skills_mentioned: Vec<String>,
    pub career_relevance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_to_display_label() {
        let json = serde_json::to_string(&NewsCategory::GovernancePolicy).unwrap();
        assert_eq!(json, r#""Governance & Policy""#);
    }

    #[test]
    fn test_date_window_deserializes_from_query_values() {
        let latest: DateWindow = serde_json::from_str(r#""latest""#).unwrap();
        assert_eq!(latest, DateWindow::Latest);

        let past: DateWindow = serde_json::from_str(r#""past30days""#).unwrap();
        assert_eq!(past, DateWindow::Past30days);
    }

    #[test]
    fn test_window_days() {
        assert_eq!(DateWindow::Latest.days(), 7);
        assert_eq!(DateWindow::Past30days.days(), 30);
    }
}
