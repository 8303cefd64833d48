use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::form::extract::EXISTING_AVATAR_FIELD;
use crate::form::{decode_resume, SubmittedForm, UploadedFile};
use crate::models::resume::Resume;

const PUBLIC_PREFIX: &str = "/static/uploads";

/// Raster formats only. Vector formats can carry script and would be served
/// from this origin.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Writes uploaded avatars into the static tree so they are served back by the
/// `/static` route. Files are named by the SHA-256 of their bytes, so the
/// editor re-sending the same image on every preview reuses one file.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    dir: PathBuf,
}

impl AvatarStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores the file and returns its public path. Fails for anything that is
    /// not a whitelisted image type.
    pub async fn save(&self, file: &UploadedFile) -> Result<String> {
        let ext = image_extension(&file.file_name)
            .with_context(|| format!("unsupported avatar type: {:?}", file.file_name))?;
        let name = format!("{}.{ext}", content_hash(&file.data));
        let path = self.dir.join(&name);

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(file = %name, "Avatar already stored");
            return Ok(format!("{PUBLIC_PREFIX}/{name}"));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating upload dir {}", self.dir.display()))?;
        tokio::fs::write(&path, &file.data)
            .await
            .with_context(|| format!("writing avatar {}", path.display()))?;

        info!(bytes = file.data.len(), file = %name, "Avatar stored");
        Ok(format!("{PUBLIC_PREFIX}/{name}"))
    }
}

fn content_hash(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn image_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Decodes a submitted form into a resume. A new upload is stored and becomes
/// the avatar; when there is none, or it cannot be stored, `avatar_existing`
/// is carried over.
pub async fn resume_from_form(form: SubmittedForm, avatars: &AvatarStore) -> Resume {
    let mut resume = decode_resume(&form.fields);

    let stored = match &form.avatar {
        Some(file) => match avatars.save(file).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Avatar not stored: {e:#}");
                None
            }
        },
        None => None,
    };

    resume.avatar = match stored {
        Some(path) => path,
        None => form
            .fields
            .get(EXISTING_AVATAR_FIELD)
            .unwrap_or_default()
            .to_string(),
    };

    resume
}
