// AI assistant: chat pass-through, one-shot resume drafting, and revision.
// Drafting and revision degrade to local results when the upstream call fails.

pub mod handlers;
pub mod heuristic;
pub mod reply;

use std::path::Path;

use tracing::{info, warn};

use crate::llm_client::prompts::DEFAULT_ASSISTANT_SYSTEM;

/// Loads the chat assistant's system prompt, falling back to the built-in one
/// when the file is missing or empty.
pub async fn load_system_prompt(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(text) if !text.trim().is_empty() => {
            info!("Assistant prompt loaded from {}", path.display());
            text
        }
        Ok(_) => {
            warn!("Assistant prompt {} is empty; using built-in prompt", path.display());
            DEFAULT_ASSISTANT_SYSTEM.to_string()
        }
        Err(e) => {
            warn!("Assistant prompt {} unreadable ({e}); using built-in prompt", path.display());
            DEFAULT_ASSISTANT_SYSTEM.to_string()
        }
    }
}
