use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;
use http::StatusCode;

use crate::auth::Session;
use crate::http_server::{file_href, notice, render, MountPrefix};
use crate::registry::{FileEntry, WatchedFile};
use crate::ServiceState;

/// A watched file as shown in the listing.
#[derive(Debug, Clone)]
pub struct FileView {
    pub name: String,
    pub path: String,
    pub size: String,
    pub last_modified: String,
    pub href: String,
}

/// A watched directory and its current children.
#[derive(Debug, Clone)]
pub struct DirectoryView {
    pub title: String,
    pub path: String,
    pub files: Vec<FileView>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub base: String,
    pub notices: Vec<String>,
    pub directories: Vec<DirectoryView>,
    pub files: Vec<FileView>,
    pub show_logout: bool,
}

/// Index page: every watched directory with its live contents, then every
/// standalone watched file.
#[tracing::instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    prefix: MountPrefix,
    jar: SignedCookieJar,
) -> Response {
    let cookies = state.cookies();
    let show_logout =
        state.credentials().is_enabled() && Session::from_jar(&jar, &cookies).logged_in;
    let (jar, notices) = notice::take(jar, &cookies);

    // Snapshot the registry so no lock is held during file-system reads
    let registry = state.registry().clone();

    let directories = registry
        .directories()
        .iter()
        .map(|dir| DirectoryView {
            title: dir.title().to_string(),
            path: dir.path().display().to_string(),
            files: dir
                .list_files()
                .iter()
                .filter_map(|file| describe(file, &prefix))
                .collect(),
        })
        .collect();

    let files = registry
        .files()
        .iter()
        .filter_map(|file| describe(file, &prefix))
        .collect();

    let template = IndexTemplate {
        base: prefix.0.clone(),
        notices,
        directories,
        files,
        show_logout,
    };

    (jar, render(StatusCode::OK, &template)).into_response()
}

/// Unreadable entries are left out of the listing.
fn describe(file: &WatchedFile, prefix: &MountPrefix) -> Option<FileView> {
    match file.describe() {
        Ok(FileEntry {
            name,
            path,
            size,
            last_modified,
        }) => Some(FileView {
            href: file_href(prefix, &path),
            name,
            path,
            size,
            last_modified,
        }),
        Err(e) => {
            tracing::debug!(path = %file.path().display(), error = %e, "skipping unreadable entry");
            None
        }
    }
}
