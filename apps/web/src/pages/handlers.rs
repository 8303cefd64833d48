use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::form::extract::read_file_part;
use crate::form::SubmittedForm;
use crate::models::resume::{demo_resume, Resume};
use crate::pages::views::{AiPage, EditorPage, HomePage, ResumeContent, ViewPage};
use crate::pages::{embed_json, render, PageMeta, RequestOrigin};
use crate::state::AppState;
use crate::uploads::resume_from_form;

/// Multipart part carrying the exported resume document.
const IMPORT_FIELD: &str = "resume_json";

#[derive(Debug, Deserialize)]
pub struct EditorQuery {
    pub template: Option<String>,
}

/// GET /
pub async fn handle_home(
    State(state): State<AppState>,
    origin: RequestOrigin,
) -> Result<Html<String>, AppError> {
    let meta = PageMeta::new(&state, &origin, "Simple Resume - Online Resume Builder", "/");
    render(&HomePage::new(meta))
}

/// GET /editor
///
/// `?template=<name>` opens the demo resume in that template; otherwise the
/// editor starts empty.
pub async fn handle_editor(
    State(state): State<AppState>,
    origin: RequestOrigin,
    Query(query): Query<EditorQuery>,
) -> Result<Html<String>, AppError> {
    let resume = match query.template.filter(|t| !t.is_empty()) {
        Some(template) => {
            let mut demo = demo_resume();
            demo.config.template = template;
            demo
        }
        None => Resume::default(),
    };

    let meta = PageMeta::new(&state, &origin, "Edit Resume", "/editor");
    render(&EditorPage::new(meta, resume))
}

/// POST /preview
pub async fn handle_preview(
    State(state): State<AppState>,
    origin: RequestOrigin,
    form: SubmittedForm,
) -> Result<Html<String>, AppError> {
    let resume = resume_from_form(form, &state.avatars).await.with_defaults();

    let page = ViewPage {
        meta: PageMeta::new(&state, &origin, "Resume Preview", "/view"),
        resume_json: embed_json(&resume),
        resume,
    };
    render(&page)
}

/// POST /api/preview
///
/// Live preview from the editor form; returns only the resume fragment.
pub async fn handle_api_preview(
    State(state): State<AppState>,
    form: SubmittedForm,
) -> Result<Html<String>, AppError> {
    let resume = resume_from_form(form, &state.avatars).await.with_defaults();
    render(&ResumeContent { resume: &resume })
}

/// POST /api/preview/json
pub async fn handle_api_preview_json(
    payload: Result<Json<Resume>, JsonRejection>,
) -> Result<Html<String>, AppError> {
    let Json(resume) = payload.map_err(|_| AppError::bad_request("Invalid JSON"))?;
    let resume = resume.with_defaults();
    render(&ResumeContent { resume: &resume })
}

/// POST /import
///
/// Loads a previously exported resume JSON file into the editor.
pub async fn handle_import(
    State(state): State<AppState>,
    origin: RequestOrigin,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, AppError> {
    if !state.config.features.enable_import {
        return Err(AppError::Forbidden("Import feature is disabled".to_string()));
    }

    let multipart = multipart.map_err(|_| AppError::bad_request("Upload failed"))?;
    let file = read_file_part(multipart, IMPORT_FIELD)
        .await?
        .ok_or_else(|| AppError::bad_request("Upload failed"))?;

    let resume: Resume = serde_json::from_slice(&file.data)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;

    info!(
        experience = resume.experience.len(),
        education = resume.education.len(),
        "Resume imported"
    );

    let meta = PageMeta::new(&state, &origin, "Edit Resume", "/editor");
    render(&EditorPage::new(meta, resume))
}

/// GET /ai
pub async fn handle_ai_page(
    State(state): State<AppState>,
    origin: RequestOrigin,
) -> Result<Html<String>, AppError> {
    if !state.config.features.enable_ai_assistant {
        return Err(AppError::NotFound("Not enabled".to_string()));
    }
    let meta = PageMeta::new(&state, &origin, "AI Resume Assistant", "/ai");
    render(&AiPage { meta })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::config::FeatureFlags;
    use crate::test_support::*;

    fn app_with(features: FeatureFlags) -> (tempfile::TempDir, axum::Router) {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config(tmp.path());
        config.features = features;
        let app = test_app(test_state(config, Arc::new(StubChat::unavailable())));
        (tmp, app)
    }

    fn app() -> (tempfile::TempDir, axum::Router) {
        app_with(FeatureFlags::default())
    }

    #[tokio::test]
    async fn test_home_renders() {
        let (_tmp, app) = app();
        let (status, headers, body) = send(app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers["content-type"].to_str().unwrap().starts_with("text/html"));
        assert!(body.contains("resume_json"), "import form shown when enabled");
    }

    #[tokio::test]
    async fn test_pages_carry_language_toggle() {
        for uri in ["/", "/editor", "/ai"] {
            let (_tmp, app) = app();
            let (_, _, body) = send(app, get(uri)).await;
            assert!(body.contains(r#"id="lang-toggle""#), "{uri}");
            assert!(body.contains("/static/js/i18n.js"), "{uri}");
            assert!(body.contains(r#"data-i18n="nav.editor""#), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_home_hides_import_when_disabled() {
        let (_tmp, app) = app_with(FeatureFlags {
            enable_import: false,
            ..FeatureFlags::default()
        });
        let (status, _, body) = send(app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("resume_json"));
    }

    #[tokio::test]
    async fn test_home_gallery_follows_template_flag() {
        let (_tmp, app) = app();
        let (_, _, body) = send(app, get("/")).await;
        assert!(body.contains("template=modern"));

        let (_tmp, app) = app_with(FeatureFlags {
            enable_template_selection: false,
            ..FeatureFlags::default()
        });
        let (_, _, body) = send(app, get("/")).await;
        assert!(!body.contains("template=modern"));
    }

    #[tokio::test]
    async fn test_editor_with_template_prefills_demo() {
        let (_tmp, app) = app();
        let (status, _, body) = send(app, get("/editor?template=modern")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Northwind Technology"));
        assert!(body.contains(r#"value="modern" selected"#));
    }

    #[tokio::test]
    async fn test_editor_without_template_is_empty() {
        let (_tmp, app) = app();
        let (status, _, body) = send(app, get("/editor")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("Northwind Technology"));
    }

    #[tokio::test]
    async fn test_preview_applies_defaults_and_orders_entries() {
        let (_tmp, app) = app();
        let request = post_urlencoded(
            "/preview",
            &[
                ("name", "Ada Lovelace"),
                ("experience[2].title", "Later Role"),
                ("experience[0].title", "Earlier Role"),
            ],
        );
        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Ada Lovelace"));
        assert!(body.contains(r##""color":"#333333""##));
        assert!(body.contains(r#""template":"classic""#));
        assert!(body.contains(r#""paper_size":"a4""#));
        let earlier = body.find("Earlier Role").unwrap();
        let later = body.find("Later Role").unwrap();
        assert!(earlier < later);
    }

    #[tokio::test]
    async fn test_preview_canonical_points_at_view() {
        let (_tmp, app) = app();
        let mut request = post_urlencoded("/preview", &[("name", "Ada")]);
        request
            .headers_mut()
            .insert("host", "cv.example.com".parse().unwrap());
        let (_, _, body) = send(app, request).await;
        assert!(body.contains("cv.example.com"));
    }

    #[tokio::test]
    async fn test_api_preview_multipart_with_avatar() {
        let (tmp, app) = app();
        let request = post_multipart(
            "/api/preview",
            &[
                ("name", None, "Grace Hopper"),
                ("education[0].school", None, "Yale"),
                ("avatar", Some("me.png"), "\u{89}PNG"),
            ],
        );
        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Grace Hopper"));
        assert!(body.contains("Yale"));
        assert!(body.contains("uploads"));

        let stored: Vec<_> = std::fs::read_dir(tmp.path().join("uploads"))
            .unwrap()
            .collect();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_previews_store_avatar_once() {
        let (tmp, app) = app();
        for _ in 0..5 {
            let request = post_multipart(
                "/api/preview",
                &[("name", None, "Grace"), ("avatar", Some("me.png"), "same bytes")],
            );
            let (status, _, body) = send(app.clone(), request).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains(".png"));
        }

        assert_eq!(std::fs::read_dir(tmp.path().join("uploads")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_svg_avatar_is_not_stored() {
        let (tmp, app) = app();
        let request = post_multipart(
            "/api/preview",
            &[
                ("name", None, "Mallory"),
                ("avatar_existing", None, "/static/uploads/old.png"),
                (
                    "avatar",
                    Some("x.svg"),
                    "<svg xmlns=\"http://www.w3.org/2000/svg\"><script>alert(1)</script></svg>",
                ),
            ],
        );
        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("old.png"));
        assert!(!body.contains(".svg"));
        assert!(!tmp.path().join("uploads").exists());
    }

    #[tokio::test]
    async fn test_injected_theme_css_not_rendered() {
        let (_tmp, app) = app();
        let (status, _, body) = send(
            app,
            post_json(
                "/api/preview/json",
                r#"{"name":"Eve","config":{"color":"red;background:url(//evil)","font":"x;}*{display:none"}}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("url(//evil)"));
        assert!(!body.contains("}*{"));
        assert!(body.contains("font-family: x*display:none;"));
        assert!(body.contains("--accent: #333333;"));
    }

    #[tokio::test]
    async fn test_api_preview_rejects_unknown_body() {
        let (_tmp, app) = app();
        let (status, _, body) = send(app, post_json("/api/preview", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid form");
    }

    #[tokio::test]
    async fn test_api_preview_json() {
        let (_tmp, app) = app();
        let (status, _, body) = send(
            app,
            post_json("/api/preview/json", r##"{"name":"Linus","config":{"color":"#ff0000"}}"##),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Linus"));
        assert!(body.contains("#ff0000"));
        assert!(body.contains("template-classic"));
    }

    #[tokio::test]
    async fn test_api_preview_json_invalid() {
        let (_tmp, app) = app();
        let (status, _, body) = send(app, post_json("/api/preview/json", "{nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid JSON");
    }

    #[tokio::test]
    async fn test_import_disabled_is_forbidden_regardless_of_payload() {
        let (_tmp, app) = app_with(FeatureFlags {
            enable_import: false,
            ..FeatureFlags::default()
        });
        let valid = post_multipart(
            "/import",
            &[("resume_json", Some("cv.json"), r#"{"name":"Ada"}"#)],
        );
        let (status, _, _) = send(app.clone(), valid).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, _) = send(app, post_json("/import", "garbage")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_import_renders_editor() {
        let (_tmp, app) = app();
        let request = post_multipart(
            "/import",
            &[(
                "resume_json",
                Some("cv.json"),
                r#"{"name":"Ada Imported","experience":[{"title":"Analyst","company":"Engine Co"}]}"#,
            )],
        );
        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Ada Imported"));
        assert!(body.contains("Engine Co"));
        assert!(body.contains("experience[0].title"));
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let (_tmp, app) = app();
        let request = post_multipart("/import", &[("other", None, "x")]);
        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Upload failed");
    }

    #[tokio::test]
    async fn test_import_invalid_json() {
        let (_tmp, app) = app();
        let request = post_multipart("/import", &[("resume_json", Some("cv.json"), "{broken")]);
        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("Invalid JSON: "));
    }

    #[tokio::test]
    async fn test_ai_page_hidden_when_disabled() {
        let (_tmp, app) = app_with(FeatureFlags {
            enable_ai_assistant: false,
            ..FeatureFlags::default()
        });
        let (status, _, body) = send(app, get("/ai")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not enabled");
    }

    #[tokio::test]
    async fn test_ai_page_renders_when_enabled() {
        let (_tmp, app) = app();
        let (status, _, _) = send(app, get("/ai")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
