use axum::{
    Json,
    extract::{FromRequest, State},
};
use tracing::info;

use crate::{
    config::SYSTEM_PROMPT,
    error::AppError,
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

/// `Json` extractor whose rejections render as `{"detail": ...}`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub async fn chat_handler(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let api_key = state
        .config
        .openai_api_key
        .as_deref()
        .ok_or(AppError::MissingApiKey)?;

    let reply = state
        .provider
        .complete(api_key, SYSTEM_PROMPT, &payload.message)
        .await?;

    info!(
        message_chars = payload.message.chars().count(),
        reply_chars = reply.chars().count(),
        "chat relayed"
    );

    Ok(Json(ChatResponse { reply }))
}
