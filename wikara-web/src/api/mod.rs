//! HTTP API handlers for wikara-web

pub mod buildinfo;
pub mod dashboard;
pub mod health;
pub mod reference;
pub mod submit;
pub mod ui;

pub use buildinfo::get_build_info;
pub use dashboard::{open_visit, view_visit};
pub use health::health_routes;
pub use reference::{get_names, get_reference};
pub use submit::submit;
pub use ui::{
    serve_css, serve_dashboard, serve_dashboard_js, serve_form, serve_form_js, serve_index,
};
