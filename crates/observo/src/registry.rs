//! The watch list: directories and individual files exposed by the panel.
//!
//! Nothing here caches file-system state. Directory membership and file
//! metadata are read every time they are asked for, so the index always
//! reflects the disk as it is at request time.

use std::io;
use std::path::{Path, PathBuf};

use crate::format::{format_size, format_system_time};

/// Directory watched by [`WatchRegistry::watch_logs`] when no path is given.
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// A single file exposed by the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFile {
    path: PathBuf,
    name: String,
}

impl WatchedFile {
    pub fn new(path: impl Into<PathBuf>, name: Option<String>) -> Self {
        let path = path.into();
        let name = name.unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        });
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> io::Result<String> {
        let meta = std::fs::metadata(&self.path)?;
        Ok(format_size(meta.len()))
    }

    pub fn last_modified(&self) -> io::Result<String> {
        let meta = std::fs::metadata(&self.path)?;
        Ok(format_system_time(meta.modified()?))
    }

    /// Read size and mtime in one `stat` call.
    pub fn describe(&self) -> io::Result<FileEntry> {
        let meta = std::fs::metadata(&self.path)?;
        Ok(FileEntry {
            name: self.name.clone(),
            path: self.path.display().to_string(),
            size: format_size(meta.len()),
            last_modified: format_system_time(meta.modified()?),
        })
    }
}

/// Presentation snapshot of a [`WatchedFile`], built per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub size: String,
    pub last_modified: String,
}

/// A directory whose immediate children are exposed by the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedDirectory {
    title: String,
    path: PathBuf,
}

impl WatchedDirectory {
    pub fn new(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the directory's current children, sorted by name.
    ///
    /// A missing or unreadable directory yields an empty list.
    pub fn list_files(&self) -> Vec<WatchedFile> {
        let entries = match std::fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "watched directory not readable");
                return Vec::new();
            }
        };

        let mut files: Vec<WatchedFile> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| WatchedFile::new(entry.path(), None))
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files
    }
}

/// Insertion-ordered lists of watched directories and files.
///
/// Entries are never removed or deduplicated; registering the same path
/// twice shows it twice.
#[derive(Debug, Clone, Default)]
pub struct WatchRegistry {
    directories: Vec<WatchedDirectory>,
    files: Vec<WatchedFile>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory. Existence is checked lazily at listing time.
    pub fn watch(&mut self, title: impl Into<String>, path: impl Into<PathBuf>) {
        self.directories.push(WatchedDirectory::new(title, path));
    }

    pub fn watch_logs(&mut self, logs_dir: impl Into<PathBuf>) {
        self.watch("logs", logs_dir);
    }

    pub fn watch_file(&mut self, path: impl Into<PathBuf>, name: Option<String>) {
        self.files.push(WatchedFile::new(path, name));
    }

    pub fn directories(&self) -> &[WatchedDirectory] {
        &self.directories
    }

    pub fn files(&self) -> &[WatchedFile] {
        &self.files
    }

    /// Whether `path` is a watched file or lies under a watched directory.
    ///
    /// Both sides are canonicalised, so a path that does not exist is never
    /// contained.
    pub fn contains(&self, path: &Path) -> bool {
        let Ok(target) = path.canonicalize() else {
            return false;
        };

        let in_dir = self.directories.iter().any(|dir| {
            dir.path
                .canonicalize()
                .map(|root| target.starts_with(root))
                .unwrap_or(false)
        });

        in_dir
            || self.files.iter().any(|file| {
                file.path
                    .canonicalize()
                    .map(|p| p == target)
                    .unwrap_or(false)
            })
    }
}
