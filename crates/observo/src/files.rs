//! File operations behind the `/file/...` routes.
//!
//! Paths arrive from the URL and are only normalised and existence-checked.
//! They are not confined to the watched roots unless the panel was built
//! with `restrict_to_watched`.

use std::io;
use std::path::{Path, PathBuf};

use crate::ServiceState;

#[derive(Debug, thiserror::Error)]
pub enum FileOpError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot display binary file content")]
    BinaryContent(PathBuf),
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Turn backslashes into slashes and collapse repeated slashes.
pub fn normalize_path(raw: &str) -> PathBuf {
    let mut normalized = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }
    PathBuf::from(normalized)
}

/// Final path component, for notices and download names.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Normalise `raw` and check that it names an existing regular file the
/// panel is allowed to touch.
pub async fn resolve(state: &ServiceState, raw: &str) -> Result<PathBuf, FileOpError> {
    let path = normalize_path(raw);

    if state.restrict_to_watched() && !state.registry().contains(&path) {
        tracing::warn!(path = %path.display(), "path outside watched roots");
        return Err(FileOpError::NotFound(path));
    }

    // A path that cannot be stat'ed is not a file the panel can operate on
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(FileOpError::NotFound(path)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot stat file");
            Err(FileOpError::NotFound(path))
        }
    }
}

/// Read the whole file as UTF-8 text.
pub async fn read_text(path: &Path) -> Result<String, FileOpError> {
    let bytes = tokio::fs::read(path).await?;
    String::from_utf8(bytes).map_err(|_| FileOpError::BinaryContent(path.to_path_buf()))
}

/// Truncate the file to zero bytes.
pub async fn clear(path: &Path) -> Result<(), FileOpError> {
    tokio::fs::write(path, b"").await?;
    Ok(())
}

pub async fn delete(path: &Path) -> Result<(), FileOpError> {
    tokio::fs::remove_file(path).await?;
    Ok(())
}
