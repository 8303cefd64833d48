use askama::Template;
use axum::{
    body::Body,
    extract::{FromRequest, Request, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::form::SubmittedForm;
use crate::models::resume::Resume;
use crate::pages::views::{PdfDocument, ResumeContent};
use crate::state::AppState;
use crate::uploads::resume_from_form;

const STYLESHEET: &str = "css/style.css";

/// POST /download/pdf
///
/// Accepts the resume as JSON or as the editor form, renders it into a
/// standalone document and streams the service's PDF back as an attachment.
/// A successful render counts as one "generate".
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    if !state.pdf.is_configured() {
        return Err(AppError::bad_request("PDF service not configured"));
    }

    let resume = read_resume(&state, request).await?.with_defaults();

    let content = ResumeContent { resume: &resume }.render()?;
    let css = tokio::fs::read_to_string(state.config.static_dir.join(STYLESHEET))
        .await
        .unwrap_or_default();
    let document = PdfDocument {
        css: &css,
        content: &content,
    }
    .render()?;

    let upstream = state.pdf.render(&document, &resume.config.paper_size).await?;
    state.metrics.record_generate();
    info!(paper = %resume.config.paper_size, "PDF generated");

    Ok((
        [
            (CONTENT_TYPE, "application/pdf"),
            (CONTENT_DISPOSITION, "attachment; filename=resume.pdf"),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

async fn read_resume(state: &AppState, request: Request) -> Result<Resume, AppError> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().starts_with("application/json"));

    if is_json {
        let Json(resume) = Json::<Resume>::from_request(request, state)
            .await
            .map_err(|_| AppError::bad_request("Invalid JSON"))?;
        Ok(resume)
    } else {
        let form = SubmittedForm::from_request(request, state).await?;
        Ok(resume_from_form(form, &state.avatars).await)
    }
}
