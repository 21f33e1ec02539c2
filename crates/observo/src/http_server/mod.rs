use askama::Template;
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use http::StatusCode;
use tower_http::trace::TraceLayer;

use crate::auth::guard::require_login;
use crate::ServiceState;

mod assets;
pub mod html;
pub mod notice;
pub mod prefix;

pub use prefix::MountPrefix;

/// Build the panel router with state applied.
///
/// Login, logout and static assets are open; the index and every file route
/// sit behind the login guard.
pub fn router(state: ServiceState) -> Router {
    let protected = Router::new()
        .route("/", get(html::index::handler))
        .route(
            "/file/*path",
            get(html::file::view_handler)
                .post(html::file::post_handler)
                .delete(html::file::delete_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route(
            "/login",
            get(html::login::page_handler).post(html::login::submit_handler),
        )
        .route("/logout", get(html::logout::handler))
        .route("/static/*file", get(assets::handler))
        .merge(protected)
        .fallback(html::not_found::handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// URL of the file routes for `path`, under the mount prefix.
///
/// A leading `/` is encoded so absolute paths survive the wildcard capture.
pub fn file_href(prefix: &MountPrefix, path: &str) -> String {
    let mut encoded = String::with_capacity(path.len() + 8);
    for (i, c) in path.chars().enumerate() {
        match c {
            '/' if i == 0 => encoded.push_str("%2F"),
            '\\' => encoded.push('/'),
            '%' => encoded.push_str("%25"),
            '?' => encoded.push_str("%3F"),
            '#' => encoded.push_str("%23"),
            ' ' => encoded.push_str("%20"),
            '"' => encoded.push_str("%22"),
            c => encoded.push(c),
        }
    }
    prefix.join(&format!("/file/{}", encoded))
}

/// Render a template, falling back to a plain 500 if rendering fails.
pub(crate) fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render template: {}", e);
            error_response("Failed to render page")
        }
    }
}

pub(crate) fn error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Error: {}", message),
    )
        .into_response()
}
