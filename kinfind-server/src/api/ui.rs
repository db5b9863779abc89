//! UI serving routes
//!
//! The web UI is embedded at compile time and served as static pages.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const INDEX_HTML: &str = include_str!("../../ui/index.html");
const UPLOAD_MISSING_HTML: &str = include_str!("../../ui/upload_missing.html");
const UPLOAD_FOUND_HTML: &str = include_str!("../../ui/upload_found.html");
const STYLE_CSS: &str = include_str!("../../ui/style.css");
const SCRIPT_JS: &str = include_str!("../../ui/script.js");

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /upload_missing.html
pub async fn serve_upload_missing() -> Html<&'static str> {
    Html(UPLOAD_MISSING_HTML)
}

/// GET /upload_found.html
pub async fn serve_upload_found() -> Html<&'static str> {
    Html(UPLOAD_FOUND_HTML)
}

/// GET /style.css
pub async fn serve_style_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], STYLE_CSS).into_response()
}

/// GET /script.js
pub async fn serve_script_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        SCRIPT_JS,
    )
        .into_response()
}

pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_index))
        .route("/upload_missing.html", get(serve_upload_missing))
        .route("/upload_found.html", get(serve_upload_found))
        .route("/style.css", get(serve_style_css))
        .route("/script.js", get(serve_script_js))
}
