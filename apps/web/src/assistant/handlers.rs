//! Axum route handlers for the AI assistant API.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assistant::heuristic::resume_from_text;
use crate::assistant::reply::parse_resume_reply;
use crate::errors::AppError;
use crate::llm_client::prompts::{generate_prompt, revise_prompt, GENERATE_SYSTEM, REVISE_SYSTEM};
use crate::llm_client::{ChatMessage, LlmError};
use crate::models::resume::Resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub resume: Resume,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Feature flag first, then credentials: a disabled assistant is 403 even
/// when no key is configured.
fn ensure_assistant(state: &AppState) -> Result<(), AppError> {
    if !state.config.features.enable_ai_assistant {
        return Err(AppError::Forbidden("Disabled".to_string()));
    }
    if !state.assistant.is_configured() {
        return Err(AppError::bad_request("Missing API key"));
    }
    Ok(())
}

fn with_system_prompt(state: &AppState, messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut conversation = Vec::with_capacity(messages.len() + 1);
    conversation.push(ChatMessage::system(state.assistant_prompt.as_ref()));
    conversation.extend(messages);
    conversation
}

/// POST /api/ai/ask
///
/// Forwards the conversation with the assistant system prompt prepended and
/// returns the first reply.
pub async fn handle_ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    ensure_assistant(&state)?;
    let Json(request) = payload.map_err(|_| AppError::bad_request("Invalid JSON"))?;

    let message = state
        .assistant
        .complete(with_system_prompt(&state, request.messages))
        .await?;

    Ok(Json(AskResponse { message }))
}

/// POST /api/ai/ask/stream
///
/// Same as `/api/ai/ask` with upstream streaming; the server-sent event body
/// is relayed as it arrives.
pub async fn handle_ask_stream(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    ensure_assistant(&state)?;
    let Json(request) = payload.map_err(|_| AppError::bad_request("Invalid JSON"))?;

    let upstream = state
        .assistant
        .stream(with_system_prompt(&state, request.messages))
        .await?;

    Ok((
        [(CONTENT_TYPE, "text/event-stream"), (CACHE_CONTROL, "no-cache")],
        Body::from_stream(upstream),
    )
        .into_response())
}

/// POST /api/ai/generate/simple
///
/// Drafts a resume from free text. Any upstream failure or unusable reply
/// falls back to local heuristic extraction, so this answers 200 whenever
/// the input is valid.
pub async fn handle_generate_simple(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Resume>, AppError> {
    ensure_assistant(&state)?;
    let request = match payload {
        Ok(Json(request)) if !request.input.trim().is_empty() => request,
        _ => return Err(AppError::bad_request("Invalid input")),
    };

    let messages = vec![
        ChatMessage::system(GENERATE_SYSTEM),
        ChatMessage::user(generate_prompt(&request.input)),
    ];
    let fallback = || resume_from_text(&request.input, Local::now().date_naive());

    let resume = match state.assistant.complete(messages).await {
        Ok(reply) => parse_resume_reply(&reply.content).unwrap_or_else(|| {
            warn!("AI draft was not a resume document; using heuristic extraction");
            fallback()
        }),
        Err(LlmError::NotConfigured) => return Err(LlmError::NotConfigured.into()),
        Err(e) => {
            warn!("AI draft failed ({e}); using heuristic extraction");
            fallback()
        }
    };

    Ok(Json(resume.with_defaults()))
}

/// POST /api/ai/revise
///
/// Applies an instruction to an existing resume. When the upstream call fails
/// or returns something unusable, the submitted resume comes back unchanged.
pub async fn handle_revise(
    State(state): State<AppState>,
    payload: Result<Json<ReviseRequest>, JsonRejection>,
) -> Result<Json<Resume>, AppError> {
    ensure_assistant(&state)?;
    let request = match payload {
        Ok(Json(request)) if !request.instruction.trim().is_empty() => request,
        _ => return Err(AppError::bad_request("Invalid input")),
    };

    let current = serde_json::to_string(&request.resume).map_err(anyhow::Error::from)?;
    let messages = vec![
        ChatMessage::system(REVISE_SYSTEM),
        ChatMessage::user(revise_prompt(&current, &request.instruction)),
    ];

    let resume = match state.assistant.complete(messages).await {
        Ok(reply) => parse_resume_reply(&reply.content).unwrap_or_else(|| {
            warn!("AI revision was not a resume document; returning input unchanged");
            request.resume.clone()
        }),
        Err(LlmError::NotConfigured) => return Err(LlmError::NotConfigured.into()),
        Err(e) => {
            warn!("AI revision failed ({e}); returning input unchanged");
            request.resume.clone()
        }
    };

    Ok(Json(resume.with_defaults()))
}
