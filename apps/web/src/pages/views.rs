// Askama templates. Files live under `apps/web/templates/`.

use askama::Template;

use crate::models::resume::Resume;
use crate::pages::{PageMeta, Theme, PAPER_SIZES, THEMES};

#[derive(Template)]
#[template(path = "index.html")]
pub struct HomePage {
    pub meta: PageMeta,
    pub themes: &'static [Theme],
}

impl HomePage {
    pub fn new(meta: PageMeta) -> Self {
        Self { meta, themes: THEMES }
    }
}

#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorPage {
    pub meta: PageMeta,
    pub resume: Resume,
    pub themes: &'static [Theme],
    pub paper_sizes: &'static [&'static str],
}

impl EditorPage {
    pub fn new(meta: PageMeta, resume: Resume) -> Self {
        Self {
            meta,
            resume,
            themes: THEMES,
            paper_sizes: PAPER_SIZES,
        }
    }

    pub fn is_template_selected(&self, id: &str) -> bool {
        self.resume.config.template == id
    }

    pub fn is_paper_selected(&self, size: &str) -> bool {
        self.resume.config.paper_size == size
    }
}

/// Full preview page; embeds the resume as JSON for client-side export.
#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewPage {
    pub meta: PageMeta,
    pub resume: Resume,
    pub resume_json: String,
}

/// The rendered resume alone, for live preview and PDF export.
#[derive(Template)]
#[template(path = "resume_content.html")]
pub struct ResumeContent<'a> {
    pub resume: &'a Resume,
}

#[derive(Template)]
#[template(path = "ai.html")]
pub struct AiPage {
    pub meta: PageMeta,
}

/// Standalone document sent to the PDF service.
#[derive(Template)]
#[template(path = "pdf_document.html")]
pub struct PdfDocument<'a> {
    pub css: &'a str,
    pub content: &'a str,
}
