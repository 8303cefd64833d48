use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_AI_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_AI_MODEL: &str = "deepseek-chat";
const DEFAULT_PROMPT_PATH: &str = "docs/prompts/resume_assistant.md";

/// Application configuration loaded from environment variables.
/// Everything except the listen port is optional; missing service credentials
/// disable the matching feature at request time instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub static_dir: PathBuf,
    /// PostgreSQL URL. When present, counters are mirrored to the database.
    pub database_url: Option<String>,
    pub ai: AiConfig,
    pub pdf: PdfConfig,
    pub features: FeatureFlags,
}

/// Chat-completion endpoint used by the AI assistant.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub prompt_path: PathBuf,
}

/// External HTML-to-PDF rendering service.
#[derive(Debug, Clone, Default)]
pub struct PdfConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

/// Feature switches decided once at startup and passed to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub enable_import: bool,
    pub enable_ai_assistant: bool,
    pub enable_template_selection: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_import: true,
            enable_ai_assistant: true,
            enable_template_selection: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = FeatureFlags::default();

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            static_dir: optional_env("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            database_url: optional_env("DATABASE_URL"),
            ai: AiConfig {
                api_url: optional_env("DEEPSEEK_API_URL")
                    .unwrap_or_else(|| DEFAULT_AI_API_URL.to_string()),
                api_key: optional_env("DEEPSEEK_API_KEY"),
                model: optional_env("DEEPSEEK_MODEL")
                    .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
                prompt_path: optional_env("AI_PROMPT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_PATH)),
            },
            pdf: PdfConfig {
                api_url: optional_env("PDF_API_URL"),
                api_key: optional_env("PDF_API_KEY"),
            },
            features: FeatureFlags {
                enable_import: flag_env("ENABLE_IMPORT", defaults.enable_import),
                enable_ai_assistant: flag_env("ENABLE_AI_ASSISTANT", defaults.enable_ai_assistant),
                enable_template_selection: flag_env(
                    "ENABLE_TEMPLATE_SELECTION",
                    defaults.enable_template_selection,
                ),
            },
        })
    }

    /// Directory uploaded avatars are written to, served under `/static/uploads`.
    pub fn uploads_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }
}

/// Reads an env var, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn flag_env(key: &str, default: bool) -> bool {
    optional_env(key).map_or(default, |v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
