//! Chat proxy — sequential model fallback over the Gemini model family.
//!
//! A request tries each candidate model in priority order and returns the
//! first success. Every candidate gets exactly one attempt: the fallback
//! across models is the retry axis, there is no same-model backoff. Trying
//! candidates in parallel would risk multiple billable calls and muddy the
//! first-success-wins semantics, so attempts stay strictly sequential.

pub mod handlers;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::upstream::{GenerativeClient, UpstreamError};

/// Models to try, highest priority first. Verified against the ListModels API.
pub const MODEL_CANDIDATES: [&str; 3] =
    ["gemini-2.0-flash", "gemini-2.5-flash", "gemini-2.5-pro"];

/// Conversation turns retained when building the prompt. Older turns are
/// dropped; ordering within the window stays chronological.
pub const HISTORY_WINDOW: usize = 6;

const SYSTEM_PREAMBLE: &str = "You are a helpful assistant for InsightEdge, a Smart Cities career guidance platform. Be concise and helpful.";

/// One prior conversation turn, as sent by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Defaulted so an absent field reports the same 400 as an empty one.
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Renders the final prompt: preamble, then the retained history window as
/// `role: content` lines in chronological order, then the new user turn.
pub fn build_prompt(message: &str, history: &[ChatMessage]) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let context = history[start..]
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{SYSTEM_PREAMBLE}\n\n{context}\nuser: {message}\nassistant:")
}

/// Tries each candidate model in order and returns the first success.
/// Mid-iteration failures are logged and swallowed; only the last one
/// survives to classification once the list is exhausted.
pub async fn generate_with_fallback(
    client: &dyn GenerativeClient,
    candidates: &[&str],
    prompt: &str,
) -> Result<String, UpstreamError> {
    let mut last_error: Option<UpstreamError> = None;

    for model in candidates {
        match client.generate(model, prompt).await {
            Ok(text) => {
                info!(model, "model succeeded");
                return Ok(text);
            }
            Err(e) => {
                warn!(model, error = %e, "model failed, falling back");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(UpstreamError::EmptyContent))
}

/// Maps a fully-exhausted fallback to the caller-facing taxonomy.
pub fn classify_failure(err: UpstreamError) -> AppError {
    if err.is_rate_limited() {
        AppError::RateLimited
    } else {
        AppError::Upstream(err.user_message())
    }
}
