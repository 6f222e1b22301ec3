use anyhow::{Context, Result};

/// Value shipped in the .env template. A key equal to this is treated the
/// same as no key at all.
pub const GEMINI_KEY_PLACEHOLDER: &str = "YOUR_GEMINI_API_KEY_HERE";

/// Application configuration loaded from environment variables.
///
/// The Gemini key is deliberately optional at startup: the server must come
/// up (and `/api/health` must answer) without it; the chat endpoint reports
/// the missing credential per request instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            news_api_key: optional_env("NEWS_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// True when a usable upstream credential is present.
    pub fn has_gemini_key(&self) -> bool {
        match self.gemini_api_key.as_deref() {
            Some(key) => !key.is_empty() && key != GEMINI_KEY_PLACEHOLDER,
            None => false,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> Config {
        Config {
            gemini_api_key: key.map(str::to_string),
            news_api_key: None,
            port: 3001,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_missing_key_is_unconfigured() {
        assert!(!config_with_key(None).has_gemini_key());
    }

    #[test]
    fn test_placeholder_key_is_unconfigured() {
        assert!(!config_with_key(Some(GEMINI_KEY_PLACEHOLDER)).has_gemini_key());
    }

    #[test]
    fn test_empty_key_is_unconfigured() {
        assert!(!config_with_key(Some("")).has_gemini_key());
    }

    #[test]
    fn test_real_key_is_configured() {
        assert!(config_with_key(Some("AIzaSyTest123")).has_gemini_key());
    }
}
