use askama::Template;
use axum::response::Response;
use http::StatusCode;

use crate::http_server::{render, MountPrefix};

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub base: String,
}

/// Fallback for unknown routes.
pub async fn handler(prefix: MountPrefix) -> Response {
    page(&prefix)
}

/// Rendered 404 page, shared by the file routes.
pub fn page(prefix: &MountPrefix) -> Response {
    render(
        StatusCode::NOT_FOUND,
        &NotFoundTemplate {
            base: prefix.0.clone(),
        },
    )
}
