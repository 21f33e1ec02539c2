use std::path::Path as FsPath;

use askama::Template;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use http::{header, StatusCode};
use tokio_util::io::ReaderStream;

use super::not_found;
use crate::files::{self, base_name, FileOpError};
use crate::format::format_size;
use crate::http_server::{error_response, file_href, notice, render, MountPrefix};
use crate::ServiceState;

/// Query parameters for file requests.
#[derive(Debug, Default)]
pub struct FileQuery {
    /// `true` (any case) serves the raw file as an attachment
    pub download: Option<String>,
}

impl FileQuery {
    /// Build from raw query pairs. The first `download` wins; repeated or
    /// unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let download = pairs
            .into_iter()
            .find(|(key, _)| key == "download")
            .map(|(_, value)| value);
        Self { download }
    }

    pub fn wants_download(&self) -> bool {
        self.download
            .as_deref()
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// Template for the text viewer.
#[derive(Template)]
#[template(path = "file_detail.html")]
pub struct FileDetailTemplate {
    pub base: String,
    pub file_name: String,
    pub file_path: String,
    pub size: String,
    pub href: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    View,
    Clear,
    Delete,
}

/// `POST /file/<path>/clear` and `/delete` share the wildcard route with
/// the plain file path, so the action is split off the tail.
fn split_action(raw: &str) -> (&str, Action) {
    if let Some(path) = raw.strip_suffix("/clear") {
        (path, Action::Clear)
    } else if let Some(path) = raw.strip_suffix("/delete") {
        (path, Action::Delete)
    } else {
        (raw, Action::View)
    }
}

#[tracing::instrument(skip(state, prefix, jar, pairs))]
pub async fn view_handler(
    State(state): State<ServiceState>,
    prefix: MountPrefix,
    jar: SignedCookieJar,
    Path(file_path): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = FileQuery::from_pairs(pairs);
    view(&state, &prefix, jar, &file_path, &query).await
}

#[tracing::instrument(skip(state, prefix, jar, pairs))]
pub async fn post_handler(
    State(state): State<ServiceState>,
    prefix: MountPrefix,
    jar: SignedCookieJar,
    Path(file_path): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = FileQuery::from_pairs(pairs);
    match split_action(&file_path) {
        (path, Action::Clear) => clear(&state, &prefix, jar, path).await,
        (path, Action::Delete) => delete_from_form(&state, &prefix, jar, path).await,
        (path, Action::View) => view(&state, &prefix, jar, path, &query).await,
    }
}

/// `DELETE /file/<path>`: plain-text answer for scripted clients.
#[tracing::instrument(skip(state, prefix))]
pub async fn delete_handler(
    State(state): State<ServiceState>,
    prefix: MountPrefix,
    Path(file_path): Path<String>,
) -> Response {
    let path = match files::resolve(&state, &file_path).await {
        Ok(path) => path,
        Err(e) => return failure(&prefix, e),
    };

    match files::delete(&path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "file deleted");
            (StatusCode::OK, "File deleted").into_response()
        }
        Err(e) => failure(&prefix, e),
    }
}

async fn view(
    state: &ServiceState,
    prefix: &MountPrefix,
    jar: SignedCookieJar,
    raw: &str,
    query: &FileQuery,
) -> Response {
    let path = match files::resolve(state, raw).await {
        Ok(path) => path,
        Err(e) => return failure(prefix, e),
    };

    if query.wants_download() {
        return download(&path).await;
    }

    match files::read_text(&path).await {
        Ok(content) => {
            let file_path = path.display().to_string();
            let template = FileDetailTemplate {
                base: prefix.0.clone(),
                file_name: base_name(&path),
                href: file_href(prefix, &file_path),
                file_path,
                size: format_size(content.len() as u64),
                content,
            };
            render(StatusCode::OK, &template)
        }
        Err(e @ FileOpError::BinaryContent(_)) => {
            tracing::debug!(path = %path.display(), "refusing to display binary file");
            let jar = notice::push(jar, &state.cookies(), e.to_string());
            (jar, Redirect::to(&prefix.index())).into_response()
        }
        Err(e) => failure(prefix, e),
    }
}

async fn download(path: &FsPath) -> Response {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("Failed to open file for download: {}", e);
            return error_response("Failed to read file");
        }
    };
    let length = file.metadata().await.map(|m| m.len()).ok();

    let disposition = content_disposition(&base_name(path));
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime_type.as_ref().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response();

    if let Some(length) = length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, http::HeaderValue::from(length));
    }
    response
}

async fn clear(
    state: &ServiceState,
    prefix: &MountPrefix,
    jar: SignedCookieJar,
    raw: &str,
) -> Response {
    let path = match files::resolve(state, raw).await {
        Ok(path) => path,
        Err(e @ FileOpError::NotFound(_)) => return failure(prefix, e),
        Err(e) => {
            tracing::error!(path = raw, error = %e, "failed to clear file");
            let jar = notice::push(jar, &state.cookies(), format!("Error clearing file: {}", e));
            return (jar, Redirect::to(&prefix.index())).into_response();
        }
    };

    let message = match files::clear(&path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "file cleared");
            format!("File {} cleared successfully", base_name(&path))
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to clear file");
            format!("Error clearing file: {}", e)
        }
    };

    let jar = notice::push(jar, &state.cookies(), message);
    (jar, Redirect::to(&prefix.index())).into_response()
}

async fn delete_from_form(
    state: &ServiceState,
    prefix: &MountPrefix,
    jar: SignedCookieJar,
    raw: &str,
) -> Response {
    let path = match files::resolve(state, raw).await {
        Ok(path) => path,
        Err(e) => return failure(prefix, e),
    };

    match files::delete(&path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "file deleted");
            let message = format!("File {} deleted", base_name(&path));
            let jar = notice::push(jar, &state.cookies(), message);
            (jar, Redirect::to(&prefix.index())).into_response()
        }
        Err(e) => failure(prefix, e),
    }
}

/// Map a failed operation onto a response. Missing files get the 404 page;
/// I/O failures answer 500 with the reason as plain text.
fn failure(prefix: &MountPrefix, error: FileOpError) -> Response {
    match error {
        FileOpError::NotFound(path) => {
            tracing::debug!(path = %path.display(), "file not found");
            not_found::page(prefix)
        }
        e => {
            tracing::error!("File operation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// `attachment` with an ASCII `filename` and, for names that need it, the
/// exact name as an RFC 6266 `filename*`.
fn content_disposition(name: &str) -> String {
    let fallback = attachment_name(name);
    if fallback == name {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(name)
        )
    }
}

/// Keep the suggested filename a valid quoted header value.
fn attachment_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect()
}
