//! In-process doubles and router helpers shared by handler tests.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tower::ServiceExt;

use crate::config::{AiConfig, Config, FeatureFlags, PdfConfig};
use crate::export::PdfClient;
use crate::llm_client::{ByteStream, ChatBackend, ChatMessage, LlmError};
use crate::metrics::Counters;
use crate::routes::build_router;
use crate::state::AppState;
use crate::uploads::AvatarStore;

pub const TEST_SYSTEM_PROMPT: &str = "test system prompt";

/// What the stub chat backend answers with.
#[derive(Debug, Clone)]
pub enum StubReply {
    Content(String),
    Unavailable,
}

/// Chat backend double that records every conversation it receives.
pub struct StubChat {
    reply: StubReply,
    configured: bool,
    pub seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubChat {
    pub fn replying(content: &str) -> Self {
        Self {
            reply: StubReply::Content(content.to_string()),
            configured: true,
            seen: Mutex::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reply: StubReply::Unavailable,
            configured: true,
            seen: Mutex::default(),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::unavailable()
        }
    }

    fn record(&self, messages: Vec<ChatMessage>) {
        self.seen.lock().unwrap().push(messages);
    }
}

#[async_trait]
impl ChatBackend for StubChat {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<ChatMessage, LlmError> {
        self.record(messages);
        match &self.reply {
            StubReply::Content(content) => Ok(ChatMessage {
                role: "assistant".to_string(),
                content: content.clone(),
            }),
            StubReply::Unavailable => Err(LlmError::Api {
                status: 503,
                message: "upstream down".to_string(),
            }),
        }
    }

    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<ByteStream, LlmError> {
        self.record(messages);
        match &self.reply {
            StubReply::Content(content) => {
                let chunks: Vec<Result<Bytes, LlmError>> = content
                    .lines()
                    .map(|line| Ok(Bytes::from(format!("{line}\n"))))
                    .collect();
                Ok(stream::iter(chunks).boxed())
            }
            StubReply::Unavailable => Err(LlmError::Api {
                status: 503,
                message: "upstream down".to_string(),
            }),
        }
    }
}

pub fn test_config(static_dir: &Path) -> Config {
    Config {
        port: 0,
        rust_log: "debug".to_string(),
        static_dir: static_dir.to_path_buf(),
        database_url: None,
        ai: AiConfig {
            api_url: "http://127.0.0.1:9/chat".to_string(),
            api_key: Some("test-key".to_string()),
            model: "test-model".to_string(),
            prompt_path: static_dir.join("prompt.md"),
        },
        pdf: PdfConfig::default(),
        features: FeatureFlags::default(),
    }
}

pub fn test_state(config: Config, chat: Arc<StubChat>) -> AppState {
    AppState {
        pdf: PdfClient::new(&config.pdf).unwrap(),
        avatars: AvatarStore::new(config.uploads_dir()),
        config,
        metrics: Arc::new(Counters::in_memory()),
        assistant: chat,
        assistant_prompt: Arc::from(TEST_SYSTEM_PROMPT),
    }
}

pub fn test_app(state: AppState) -> Router {
    build_router(state)
}

/// Serves `app` on an ephemeral local port, standing in for an upstream HTTP
/// service. Returns the bound address.
pub async fn spawn_upstream(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Sends one request through the router and returns status, headers, and body text.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub fn post_urlencoded(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(pairs).unwrap();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub const BOUNDARY: &str = "resume-test-boundary";

/// A multipart part: `(name, Some(file_name), contents)` for files, `(name, None, text)` otherwise.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a str);

pub fn post_multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
