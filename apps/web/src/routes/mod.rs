pub mod health;
pub mod seo;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::X_CONTENT_TYPE_OPTIONS, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer};

use crate::assistant::handlers as assistant;
use crate::export::handlers as export;
use crate::metrics::handlers as metrics;
use crate::pages::handlers as pages;
use crate::state::AppState;

/// Upper bound on request bodies; covers avatar uploads and imported documents.
pub const MAX_BODY_BYTES: usize = 32 << 20;

pub fn build_router(state: AppState) -> Router {
    // Uploaded avatars are served from here; browsers must not guess their type.
    let static_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .service(ServeDir::new(&state.config.static_dir));

    Router::new()
        // Pages
        .route("/", get(pages::handle_home))
        .route("/editor", get(pages::handle_editor))
        .route("/preview", post(pages::handle_preview))
        .route("/import", post(pages::handle_import))
        .route("/ai", get(pages::handle_ai_page))
        // Fragments
        .route("/api/preview", post(pages::handle_api_preview))
        .route("/api/preview/json", post(pages::handle_api_preview_json))
        // AI assistant
        .route("/api/ai/ask", post(assistant::handle_ask))
        .route("/api/ai/ask/stream", post(assistant::handle_ask_stream))
        .route(
            "/api/ai/generate/simple",
            post(assistant::handle_generate_simple),
        )
        .route("/api/ai/revise", post(assistant::handle_revise))
        // Export
        .route("/download/pdf", post(export::handle_download_pdf))
        // Counters
        .route("/metrics/generate", post(metrics::handle_generate_event))
        .route("/metrics/snapshot", get(metrics::handle_snapshot))
        // Operational
        .route("/healthz", get(health::health_handler))
        .route("/robots.txt", get(seo::handle_robots))
        .route("/sitemap.xml", get(seo::handle_sitemap))
        .nest_service("/static", static_files)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::count_visits,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::test_support::*;

    #[tokio::test]
    async fn test_serves_static_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("css")).unwrap();
        std::fs::write(tmp.path().join("css/style.css"), "body { margin: 0; }").unwrap();

        let app = test_app(test_state(
            test_config(tmp.path()),
            Arc::new(StubChat::unavailable()),
        ));
        let (status, headers, body) = send(app, get("/static/css/style.css")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body { margin: 0; }");
        assert_eq!(headers["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_uploaded_files_are_not_sniffed() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("uploads")).unwrap();
        std::fs::write(tmp.path().join("uploads/legacy.png"), "<html><script></script>").unwrap();

        let app = test_app(test_state(
            test_config(tmp.path()),
            Arc::new(StubChat::unavailable()),
        ));
        let (status, headers, _) = send(app, get("/static/uploads/legacy.png")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "image/png");
        assert_eq!(headers["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(test_state(
            test_config(tmp.path()),
            Arc::new(StubChat::unavailable()),
        ));
        let (status, _, _) = send(app, get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
