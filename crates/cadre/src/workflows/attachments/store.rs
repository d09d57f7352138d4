use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::Local;
use tokio::fs;
use tracing::{debug, info};

/// Extensions accepted for upload, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["pdf", "doc", "docx", "jpg", "jpeg", "png"];

/// Types a browser can display in place.
const INLINE_EXTENSIONS: [&str; 5] = ["pdf", "jpg", "jpeg", "png", "gif"];

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn is_allowed(name: &str) -> bool {
    extension(name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_inline_type(name: &str) -> bool {
    extension(name).is_some_and(|ext| INLINE_EXTENSIONS.contains(&ext.as_str()))
}

/// Stem used when nothing of the original stem survives sanitizing.
const PLACEHOLDER_STEM: &str = "file";

/// Reduce an uploaded file name to a safe single path segment.
///
/// Directory parts are dropped, whitespace becomes `_`, and anything other than
/// ASCII letters, digits, `.`, `-` and `_` is removed. Leading dots and
/// underscores are stripped so the result is never hidden or relative. The
/// extension is kept; a stem written entirely in other scripts becomes `file`.
pub fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (base, None),
    };

    let stem = clean_segment(stem);
    let stem = if stem.is_empty() {
        PLACEHOLDER_STEM.to_string()
    } else {
        stem
    };
    match ext.map(clean_segment).filter(|ext| !ext.is_empty()) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Safe ASCII form of one path segment; empty when nothing usable is left.
fn clean_segment(raw: &str) -> String {
    let cleaned: String = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'))
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Human readable size with one decimal, e.g. `1.5 KB`.
pub fn size_label(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in SIZE_UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("no file was selected")]
    MissingFile,
    #[error("file type of `{0}` is not allowed")]
    NotAllowed(String),
    #[error("file name `{0}` has no usable characters")]
    InvalidName(String),
    #[error("path `{0}` is outside the uploads directory")]
    InvalidPath(String),
    #[error("file `{0}` not found")]
    NotFound(String),
    #[error("malformed multipart body: {0}")]
    Multipart(String),
    #[error("file storage failed: {0}")]
    Io(#[from] io::Error),
}

/// Directory-backed store for uploaded attachments.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<(), AttachmentError> {
        fs::create_dir_all(&self.root).await?;
        info!(path = %self.root.display(), "uploads directory ready");
        Ok(())
    }

    /// Write an upload and return its stored name relative to the root.
    ///
    /// The name is `YYYYMMDD_HHMMSS_<sanitized original>`, placed inside
    /// `folder` when one is given.
    pub async fn save(
        &self,
        original: &str,
        folder: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, AttachmentError> {
        if !is_allowed(original) {
            return Err(AttachmentError::NotAllowed(original.to_string()));
        }
        let safe = sanitize(original);
        if !is_allowed(&safe) {
            return Err(AttachmentError::InvalidName(original.to_string()));
        }

        let name = format!("{}_{safe}", Local::now().format("%Y%m%d_%H%M%S"));
        let relative = match folder.map(str::trim).filter(|folder| !folder.is_empty()) {
            Some(folder) => {
                let base = folder.rsplit(['/', '\\']).next().unwrap_or_default();
                let folder_name = clean_segment(base);
                if folder_name.is_empty() {
                    return Err(AttachmentError::InvalidName(folder.to_string()));
                }
                format!("{folder_name}/{name}")
            }
            None => name,
        };

        let path = self.resolve(&relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        info!(file = %relative, size = bytes.len(), "stored upload");
        Ok(relative)
    }

    /// Map a stored name to a path under the root, rejecting traversal.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, AttachmentError> {
        let path = Path::new(relative);
        let mut components = path.components().peekable();
        if components.peek().is_none()
            || !components.all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(AttachmentError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(path))
    }

    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, AttachmentError> {
        let path = self.resolve(relative)?;
        debug!(path = %path.display(), "reading stored file");
        fs::read(&path).await.map_err(|err| not_found_or(err, relative))
    }

    pub async fn size(&self, relative: &str) -> Result<u64, AttachmentError> {
        let path = self.resolve(relative)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|err| not_found_or(err, relative))?;
        Ok(metadata.len())
    }
}

fn not_found_or(err: io::Error, relative: &str) -> AttachmentError {
    if err.kind() == io::ErrorKind::NotFound {
        AttachmentError::NotFound(relative.to_string())
    } else {
        AttachmentError::Io(err)
    }
}
