use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::{json, Value};

use crate::metrics::Snapshot;
use crate::state::AppState;

/// Path prefixes that never count as a page visit.
const UNCOUNTED_PREFIXES: &[&str] = &["/static", "/.well-known"];

/// Exact paths that never count as a page visit.
const UNCOUNTED_PATHS: &[&str] = &[
    "/robots.txt",
    "/sitemap.xml",
    "/favicon.ico",
    "/metrics/snapshot",
    "/healthz",
];

pub fn counts_as_visit(path: &str) -> bool {
    !UNCOUNTED_PATHS.contains(&path)
        && !UNCOUNTED_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
}

/// Middleware: counts every GET outside the excluded paths, before the
/// request is handled.
pub async fn count_visits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() == Method::GET && counts_as_visit(request.uri().path()) {
        state.metrics.record_visit();
    }
    next.run(request).await
}

/// POST /metrics/generate
///
/// Lets the browser report a client-side export.
pub async fn handle_generate_event(State(state): State<AppState>) -> Json<Value> {
    state.metrics.record_generate();
    Json(json!({ "ok": true }))
}

/// GET /metrics/snapshot
pub async fn handle_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.metrics.snapshot())
}
