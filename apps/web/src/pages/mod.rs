//! Server-rendered pages and fragments.

pub mod handlers;
pub mod views;

use std::convert::Infallible;

use askama::Template;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
    response::Html,
};

use crate::config::FeatureFlags;
use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::state::AppState;

/// A selectable resume layout.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub id: &'static str,
    pub label: &'static str,
}

pub const THEMES: &[Theme] = &[
    Theme { id: "classic", label: "Classic" },
    Theme { id: "modern", label: "Modern" },
    Theme { id: "minimal", label: "Minimal" },
];

pub const PAPER_SIZES: &[&str] = &["a4", "letter"];

/// Scheme and host as seen by the client, honouring `X-Forwarded-Proto`
/// from a TLS-terminating proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn url(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.host, path)
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scheme = header_value(&parts.headers, "x-forwarded-proto").unwrap_or("http");
        let host = header_value(&parts.headers, "host")
            .or(parts.uri.host())
            .unwrap_or("localhost");
        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
        })
    }
}

/// Data every full page renders in its shell: title, canonical link, counters,
/// and which features to show.
#[derive(Debug, Clone)]
pub struct PageMeta {
    pub title: &'static str,
    pub canonical: String,
    pub visits: u64,
    pub generates: u64,
    pub features: FeatureFlags,
}

impl PageMeta {
    pub fn new(state: &AppState, origin: &RequestOrigin, title: &'static str, path: &str) -> Self {
        let counts = state.metrics.snapshot();
        Self {
            title,
            canonical: origin.url(path),
            visits: counts.visits,
            generates: counts.generates,
            features: state.config.features,
        }
    }
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

/// Serializes a resume for a `<script type="application/json">` block.
/// `<`, `>` and `&` only occur inside JSON strings, where the `\u` escapes are
/// equivalent, so the markup cannot terminate the script element early.
pub fn embed_json(resume: &Resume) -> String {
    serde_json::to_string(resume)
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
