//! Upstream generative-text adapter — the single point of entry for all
//! Gemini API calls in InsightEdge.
//!
//! ARCHITECTURAL RULE: no other module may call the Gemini API directly.
//! Handlers depend on the `GenerativeClient` trait, never on reqwest, so
//! tests can drive the chat proxy against a scripted double.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Substrings that identify a quota/rate-limit failure in upstream error
/// text. Matching on message text is a heuristic coupled to vendor wording;
/// the HTTP 429 status check in `is_rate_limited` is the structured signal
/// and is consulted first.
const RATE_LIMIT_MARKERS: [&str; 3] = ["quota", "429", "resource_exhausted"];

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,
}

impl UpstreamError {
    /// Classifies this error as a quota/rate-limit failure: HTTP 429 first,
    /// then case-insensitive marker matching on the error text.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            UpstreamError::Api { status: 429, .. } => true,
            UpstreamError::Api { message, .. } => contains_rate_limit_marker(message),
            UpstreamError::Http(e) => contains_rate_limit_marker(&e.to_string()),
            UpstreamError::EmptyContent => false,
        }
    }

    /// The failure text surfaced to the caller: the upstream message when
    /// one exists, a generic fallback otherwise. Never exposes adapter
    /// internals beyond the upstream-provided message.
    pub fn user_message(&self) -> String {
        match self {
            UpstreamError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            UpstreamError::Http(e) => e.to_string(),
            _ => "Failed to get response from AI".to_string(),
        }
    }
}

fn contains_rate_limit_marker(text: &str) -> bool {
    let text = text.to_lowercase();
    RATE_LIMIT_MARKERS.iter().any(|marker| text.contains(marker))
}

/// A generative-text backend: one prompt in, one completion out.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, UpstreamError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Production `GenerativeClient` backed by the Gemini `generateContent`
/// endpoint. One HTTP call per `generate` — fallback across models is the
/// caller's concern, not this adapter's.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, UpstreamError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.client.post(&url).json(&request_body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the structured error message
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = extract_text(parsed).ok_or(UpstreamError::EmptyContent)?;

        debug!(model, chars = text.len(), "generation succeeded");

        Ok(text)
    }
}

/// Concatenates the text parts of the first candidate. `None` when the
/// response carries no usable text.
fn extract_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|text| !text.is_empty())
}
