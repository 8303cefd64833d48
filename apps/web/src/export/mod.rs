//! PDF export through an external HTML-to-PDF service.
//!
//! The resume fragment is wrapped in a standalone document with the site
//! stylesheet inlined, then posted with bearer auth. The response body is
//! streamed straight back to the browser.

pub mod handlers;

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::PdfConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const PAGE_MARGIN: &str = "0.5in";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF service is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PDF service returned status {0}")]
    Status(u16),
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
    options: RenderOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderOptions {
    print_background: bool,
    format: String,
    margin: Margin,
}

#[derive(Debug, Serialize)]
struct Margin {
    top: &'static str,
    bottom: &'static str,
    left: &'static str,
    right: &'static str,
}

impl RenderOptions {
    fn for_paper(paper_size: &str) -> Self {
        Self {
            print_background: true,
            format: paper_size.to_uppercase(),
            margin: Margin {
                top: PAGE_MARGIN,
                bottom: PAGE_MARGIN,
                left: PAGE_MARGIN,
                right: PAGE_MARGIN,
            },
        }
    }
}

#[derive(Clone)]
pub struct PdfClient {
    client: Client,
    endpoint: Option<Endpoint>,
}

#[derive(Clone)]
struct Endpoint {
    url: String,
    api_key: String,
}

impl PdfClient {
    pub fn new(config: &PdfConfig) -> reqwest::Result<Self> {
        let endpoint = match (&config.api_url, &config.api_key) {
            (Some(url), Some(api_key)) => Some(Endpoint {
                url: url.clone(),
                api_key: api_key.clone(),
            }),
            _ => None,
        };
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            endpoint,
        })
    }

    /// Both the URL and the key are required.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Posts `html` for rendering and returns the successful upstream response,
    /// whose body is the PDF.
    pub async fn render(&self, html: &str, paper_size: &str) -> Result<reqwest::Response, PdfError> {
        let endpoint = self.endpoint.as_ref().ok_or(PdfError::NotConfigured)?;

        let payload = RenderRequest {
            html,
            options: RenderOptions::for_paper(paper_size),
        };

        let response = self
            .client
            .post(&endpoint.url)
            .bearer_auth(&endpoint.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PdfError::Status(status.as_u16()));
        }

        debug!(format = %payload.options.format, "PDF rendered");
        Ok(response)
    }
}
