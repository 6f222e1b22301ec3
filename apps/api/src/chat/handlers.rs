use axum::{extract::State, Json};

use crate::chat::{
    build_prompt, classify_failure, generate_with_fallback, ChatRequest, ChatResponse,
    MODEL_CANDIDATES,
};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/chat
///
/// Validation and the credential check both short-circuit before any
/// upstream call; only a fully-exhausted candidate list reports failure.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::InvalidRequest("Message is required".to_string()));
    }

    if !state.config.has_gemini_key() {
        return Err(AppError::Unconfigured);
    }

    let prompt = build_prompt(&req.message, &req.history);

    let response = generate_with_fallback(state.generative.as_ref(), &MODEL_CANDIDATES, &prompt)
        .await
        .map_err(classify_failure)?;

    Ok(Json(ChatResponse { response }))
}
