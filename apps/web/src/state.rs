use std::sync::Arc;

use crate::config::Config;
use crate::export::PdfClient;
use crate::llm_client::ChatBackend;
use crate::metrics::CounterService;
use crate::uploads::AvatarStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Visit / generate counters. In-memory, optionally mirrored to PostgreSQL.
    pub metrics: Arc<dyn CounterService>,
    /// Chat-completion backend for the AI assistant routes.
    pub assistant: Arc<dyn ChatBackend>,
    /// System prompt prepended to every `/api/ai/ask` conversation.
    pub assistant_prompt: Arc<str>,
    pub pdf: PdfClient,
    pub avatars: AvatarStore,
}
