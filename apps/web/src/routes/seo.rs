use std::fmt::Write;

use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use chrono::Local;

use crate::pages::RequestOrigin;

/// Pages listed in the sitemap.
const SITEMAP_PATHS: &[&str] = &["/", "/editor"];

/// GET /robots.txt
pub async fn handle_robots(origin: RequestOrigin) -> impl IntoResponse {
    let body = format!(
        "User-agent: *\nAllow: /\nSitemap: {}\n",
        origin.url("/sitemap.xml")
    );
    ([(CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

/// GET /sitemap.xml
pub async fn handle_sitemap(origin: RequestOrigin) -> impl IntoResponse {
    let today = Local::now().format("%Y-%m-%d");

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for path in SITEMAP_PATHS {
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{today}</lastmod>\n    \
             <changefreq>weekly</changefreq>\n    <priority>0.8</priority>\n  </url>\n",
            origin.url(path)
        );
    }
    xml.push_str("</urlset>");

    ([(CONTENT_TYPE, "application/xml; charset=utf-8")], xml)
}
