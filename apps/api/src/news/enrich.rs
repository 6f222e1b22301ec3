//! Content enrichment: category, role, and skill tagging plus the
//! career-relevance blurb. Everything here is keyword-driven and
//! deterministic — no LLM call, no I/O.

use crate::news::models::{FetchedItem, NewsArticle, NewsCategory, SmartCityRole};

const SUMMARY_MAX_CHARS: usize = 200;
const MAX_SKILLS: usize = 5;

const SKILL_KEYWORDS: [(&str, &str); 11] = [
    ("data analysis", "Data Analysis"),
    ("python", "Python"),
    ("sql", "SQL"),
    ("gis", "GIS Mapping"),
    ("iot", "IoT Systems"),
    ("machine learning", "Machine Learning"),
    ("ai", "AI & Machine Learning"),
    ("visualization", "Data Visualization"),
    ("urban planning", "Urban Planning"),
    ("transportation", "Transportation Systems"),
    ("project management", "Project Management"),
];

/// Assigns a category from the article text. First matching bucket wins;
/// anything unmatched lands in the catch-all `Smart Cities`.
pub fn categorize(title: &str, description: &str) -> NewsCategory {
    let text = format!("{title} {description}").to_lowercase();

    let matches = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if matches(&["mobility", "transport", "traffic"]) {
        NewsCategory::UrbanMobility
    } else if matches(&["infrastructure", "disaster", "resilience"]) {
        NewsCategory::Infrastructure
    } else if matches(&["sustainability", "carbon", "energy", "green"]) {
        NewsCategory::Sustainability
    } else if matches(&["governance", "policy", "government", "data.gov"]) {
        NewsCategory::GovernancePolicy
    } else if matches(&["technology", "digital", "iot"]) {
        NewsCategory::TechnologyInCities
    } else {
        NewsCategory::SmartCities
    }
}

/// Roles the article is relevant to. Always non-empty — an article nothing
/// matches still gets the default analyst tag.
pub fn related_roles(title: &str, description: &str) -> Vec<SmartCityRole> {
    let text = format!("{title} {description}").to_lowercase();
    let mut roles = Vec::new();

    if ["data", "analytics", "analysis"].iter().any(|k| text.contains(k)) {
        roles.push(SmartCityRole::UrbanDataAnalyst);
    }
    if ["mobility", "transport", "traffic"].iter().any(|k| text.contains(k)) {
        roles.push(SmartCityRole::SmartMobilityAnalyst);
    }
    if ["operations", "management", "infrastructure"].iter().any(|k| text.contains(k)) {
        roles.push(SmartCityRole::CityOperationsAnalyst);
    }

    if roles.is_empty() {
        roles.push(SmartCityRole::UrbanDataAnalyst);
    }

    roles
}

/// Skills named in the article text, capped at five.
pub fn skills_mentioned(title: &str, description: &str) -> Vec<String> {
    let text = format!("{title} {description}").to_lowercase();
    let mut skills = Vec::new();

    for (keyword, skill) in SKILL_KEYWORDS {
        if text.contains(keyword) && !skills.iter().any(|s| s == skill) {
            skills.push(skill.to_string());
        }
    }

    skills.truncate(MAX_SKILLS);
    skills
}

pub fn career_relevance(roles: &[SmartCityRole], category: NewsCategory) -> String {
    let role_text = roles
        .iter()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(" or ");

    format!(
        "This article highlights developments in {} that directly impact Smart City professionals. \
         As a {}, understanding these trends helps you stay current with industry developments and \
         identify emerging opportunities in urban technology and planning.",
        category.label().to_lowercase(),
        role_text
    )
}

/// First two sentences of the description, capped at 200 characters. Falls
/// back to the title when the description is empty.
pub fn summarize(description: &str, title: &str) -> String {
    let summary = description
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(2)
        .collect::<Vec<_>>()
        .join(". ");

    let summary = if summary.is_empty() {
        title.to_string()
    } else {
        summary
    };

    if summary.chars().count() > SUMMARY_MAX_CHARS {
        let truncated: String = summary.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        summary
    }
}

/// Enriches a fetched item into the article shape served to the frontend.
/// `index` disambiguates ids within a single sweep.
pub fn into_article(item: FetchedItem, index: usize) -> NewsArticle {
    let category = categorize(&item.title, &item.description);
    let roles = related_roles(&item.title, &item.description);
    let skills = skills_mentioned(&item.title, &item.description);
    let relevance = career_relevance(&roles, category);
    let summary = summarize(&item.description, &item.title);

    let slug = item.source.to_lowercase().replace(' ', "-");
    let content = if item.description.is_empty() {
        item.title.clone()
    } else {
        item.description.clone()
    };

    NewsArticle {
        id: format!("{slug}-{index}-{}", item.published.timestamp()),
        title: item.title,
        summary,
        content,
        category,
        source: item.source,
        published_date: item.published.format("%Y-%m-%d").to_string(),
        image_url: item.image_url,
        url: item.url,
        related_roles: roles,
        skills_mentioned: skills,
        career_relevance: relevance,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_categorize_mobility() {
        assert_eq!(
            categorize("New transport corridor opens", ""),
            NewsCategory::UrbanMobility
        );
        assert_eq!(
            categorize("Traffic signals get adaptive timing", ""),
            NewsCategory::UrbanMobility
        );
    }

    #[test]
    fn test_categorize_infrastructure() {
        assert_eq!(
            categorize("Bridge resilience upgrades funded", ""),
            NewsCategory::Infrastructure
        );
    }

    #[test]
    fn test_categorize_sustainability() {
        assert_eq!(
            categorize("City hits carbon reduction target", ""),
            NewsCategory::Sustainability
        );
    }

    #[test]
    fn test_categorize_governance() {
        assert_eq!(
            categorize("Open data policy adopted by council", ""),
            NewsCategory::GovernancePolicy
        );
    }

    #[test]
    fn test_categorize_fallback_is_smart_cities() {
        assert_eq!(
            categorize("Community garden expands", "volunteers welcome"),
            NewsCategory::SmartCities
        );
    }

    #[test]
    fn test_mobility_wins_over_later_buckets() {
        // "traffic" and "infrastructure" both present; first bucket wins.
        assert_eq!(
            categorize("Traffic infrastructure overhaul", ""),
            NewsCategory::UrbanMobility
        );
    }

    #[test]
    fn test_related_roles_default_when_nothing_matches() {
        assert_eq!(
            related_roles("Pie contest", "bakery wins"),
            vec![SmartCityRole::UrbanDataAnalyst]
        );
    }

    #[test]
    fn test_related_roles_accumulate() {
        let roles = related_roles("Traffic data analysis for city operations", "");
        assert!(roles.contains(&SmartCityRole::UrbanDataAnalyst));
        assert!(roles.contains(&SmartCityRole::SmartMobilityAnalyst));
        assert!(roles.contains(&SmartCityRole::CityOperationsAnalyst));
    }

    #[test]
    fn test_skills_capped_at_five() {
        let skills = skills_mentioned(
            "python sql gis iot machine learning visualization urban planning",
            "data analysis transportation project management",
        );
        assert_eq!(skills.len(), 5);
    }

    #[test]
    fn test_skills_no_duplicates() {
        let skills = skills_mentioned("python python python", "");
        assert_eq!(skills, vec!["Python".to_string()]);
    }

    #[test]
    fn test_summarize_takes_first_two_sentences() {
        let summary = summarize("First sentence. Second one! Third ignored.", "title");
        assert_eq!(summary, "First sentence. Second one");
    }

    #[test]
    fn test_summarize_falls_back_to_title() {
        assert_eq!(summarize("", "The Title"), "The Title");
    }

    #[test]
    fn test_summarize_truncates_long_text() {
        let long = "word ".repeat(100);
        let summary = summarize(&long, "title");
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn test_career_relevance_mentions_category_and_roles() {
        let text = career_relevance(
            &[SmartCityRole::SmartMobilityAnalyst],
            NewsCategory::UrbanMobility,
        );
        assert!(text.contains("urban mobility"));
        assert!(text.contains("Smart Mobility Analyst"));
    }

    #[test]
    fn test_into_article_builds_id_and_date() {
        let item = FetchedItem {
            title: "Smart city sensors roll out".to_string(),
            description: "IoT sensors track traffic. Data feeds the city dashboard.".to_string(),
            url: "https://news.example/sensors".to_string(),
            published: Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap(),
            source: "Test Wire".to_string(),
            image_url: None,
        };

        let article = into_article(item, 3);

        assert!(article.id.starts_with("test-wire-3-"));
        assert_eq!(article.published_date, "2025-06-15");
        assert_eq!(article.category, NewsCategory::UrbanMobility);
        assert!(!article.related_roles.is_empty());
        assert!(!article.career_relevance.is_empty());
    }
}
