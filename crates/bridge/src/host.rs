//! Host-side file operations and platform policy.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

/// Largest file `open_html_file` accepts.
pub const MAX_OPEN_BYTES: u64 = 10 * 1024 * 1024;

pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
pub const DEFAULT_SAVE_NAME: &str = "output.md";

#[derive(Debug, Error)]
pub enum FileIoError {
    #[error("File does not exist: {path}")]
    NotFound { path: PathBuf },
    #[error("File is too large (max 10MB): {path} is {size} bytes")]
    TooLarge { path: PathBuf, size: u64 },
    #[error("Invalid file path")]
    InvalidPath,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileIoError {
    /// Body of the blocking error dialog for a failed open.
    pub fn open_dialog_message(&self) -> String {
        format!("Failed to open file: {self}")
    }

    /// Body of the blocking error dialog for a failed save.
    pub fn save_dialog_message(&self) -> String {
        format!("Failed to save file: {self}")
    }
}

/// Reads an HTML file as UTF-8. Files over [`MAX_OPEN_BYTES`] are rejected before reading.
pub fn open_html_file(path: &Path) -> Result<String, FileIoError> {
    let metadata = fs::metadata(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => FileIoError::NotFound {
            path: path.to_path_buf(),
        },
        _ => FileIoError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    if metadata.len() > MAX_OPEN_BYTES {
        return Err(FileIoError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| FileIoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Opened {}", path.display());
    Ok(content)
}

/// Writes Markdown to `path`, overwriting any existing file.
pub fn save_markdown_content(path: &Path, content: &str) -> Result<(), FileIoError> {
    if path.as_os_str().is_empty() || path.file_name().is_none() {
        return Err(FileIoError::InvalidPath);
    }
    fs::write(path, content).map_err(|source| {
        let err = FileIoError::Write {
            path: path.to_path_buf(),
            source,
        };
        error!("Error saving markdown: {err}");
        err
    })?;
    info!("Saved markdown to {}", path.display());
    Ok(())
}

/// Success dialog detail line, e.g. `File: notes.md`.
pub fn saved_file_detail(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("File: {name}")
}

/// Whether closing the last window should end the process on `os`.
pub fn quits_when_all_windows_closed(os: &str) -> bool {
    os != "macos"
}
