//! Request extractor for resume forms.
//!
//! The editor submits `multipart/form-data` (it may carry an avatar file);
//! scripted clients may post `application/x-www-form-urlencoded`. Anything else
//! is rejected with `400 Invalid form`.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::form::decoder::FormFields;

pub const AVATAR_FIELD: &str = "avatar";
pub const EXISTING_AVATAR_FIELD: &str = "avatar_existing";

/// A file part received in a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Text fields and the optional avatar file of a submitted resume form.
#[derive(Debug, Default)]
pub struct SubmittedForm {
    pub fields: FormFields,
    pub avatar: Option<UploadedFile>,
}

fn invalid_form() -> AppError {
    AppError::bad_request("Invalid form")
}

#[async_trait]
impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let form = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|_| invalid_form())?;
            read_multipart(multipart).await?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|_| invalid_form())?;
            SubmittedForm {
                fields: pairs.into_iter().collect(),
                avatar: None,
            }
        } else {
            return Err(invalid_form());
        };

        debug!(
            fields = form.fields.len(),
            has_avatar = form.avatar.is_some(),
            "resume form received"
        );
        Ok(form)
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<SubmittedForm, AppError> {
    let mut form = SubmittedForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|_| invalid_form())? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_owned) {
            let data = field.bytes().await.map_err(|_| invalid_form())?;
            // Browsers send an empty part when no file was chosen.
            if name == AVATAR_FIELD && !data.is_empty() {
                form.avatar = Some(UploadedFile { file_name, data });
            }
            continue;
        }

        let value = field.text().await.map_err(|_| invalid_form())?;
        form.fields.push(name, value);
    }

    Ok(form)
}

/// Reads a single named file part, skipping everything else.
/// Used by endpoints that take an uploaded document rather than a resume form.
pub async fn read_file_part(
    mut multipart: Multipart,
    part: &str,
) -> Result<Option<UploadedFile>, AppError> {
    let upload_failed = || AppError::bad_request("Upload failed");

    while let Some(field) = multipart.next_field().await.map_err(|_| upload_failed())? {
        if field.name() != Some(part) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|_| upload_failed())?;
        return Ok(Some(UploadedFile { file_name, data }));
    }
    Ok(None)
}
