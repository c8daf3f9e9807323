//! UI serving routes
//!
//! Pages and assets are compiled into the binary.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const FORM_HTML: &str = include_str!("../ui/form.html");
const DASHBOARD_HTML: &str = include_str!("../ui/dashboard.html");
const FORM_JS: &str = include_str!("../ui/form.js");
const DASHBOARD_JS: &str = include_str!("../ui/dashboard.js");
const WIKARA_CSS: &str = include_str!("../ui/wikara.css");

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// GET /
///
/// Welcome page linking to the form and the dashboard
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /form
pub async fn serve_form() -> Html<&'static str> {
    Html(FORM_HTML)
}

/// GET /dashboard
pub async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// GET /static/form.js
pub async fn serve_form_js() -> Response {
    asset("application/javascript", FORM_JS)
}

/// GET /static/dashboard.js
pub async fn serve_dashboard_js() -> Response {
    asset("application/javascript", DASHBOARD_JS)
}

/// GET /static/wikara.css
pub async fn serve_css() -> Response {
    asset("text/css", WIKARA_CSS)
}
