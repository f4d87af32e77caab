//! Path writer
//!
//! Writes artifact bodies below an explicit workspace root. Every write is a
//! full overwrite; parent directories are created as needed.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Suffix of the sibling file used for atomic replacement
const TEMP_SUFFIX: &str = ".litepatch-tmp";

/// Error writing an artifact
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Invalid artifact path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Failed to create directory for {path}: {message}")]
    CreateDir { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Writes files relative to a workspace root
#[derive(Debug, Clone)]
pub struct PathWriter {
    base_dir: PathBuf,
    atomic: bool,
}

impl PathWriter {
    /// Create a writer rooted at `base_dir`, with atomic replacement on
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            atomic: true,
        }
    }

    /// Toggle write-then-rename replacement
    ///
    /// Atomic mode keeps the destination's permissions and writes through symlinks.
    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a relative artifact path below the workspace root
    ///
    /// Absolute paths and `..` components are rejected so an artifact can
    /// never land outside the workspace.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, WriteError> {
        let invalid = |reason: &str| WriteError::InvalidPath {
            path: relative.to_string(),
            reason: reason.to_string(),
        };

        let path = Path::new(relative);
        if relative.is_empty() {
            return Err(invalid("path is empty"));
        }

        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => return Err(invalid("path escapes the workspace root")),
                Component::RootDir | Component::Prefix(_) => return Err(invalid("path must be relative")),
            }
        }

        if path.file_name().is_none() {
            return Err(invalid("path has no file name"));
        }

        Ok(self.base_dir.join(path))
    }

    /// Write `content` as the complete body of `relative`
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf, WriteError> {
        let target = self.resolve(relative)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                path: relative.to_string(),
                message: e.to_string(),
            })?;
        }

        let written = if self.atomic {
            write_atomic(&target, content.as_bytes())
        } else {
            fs::write(&target, content)
        };

        written.map_err(|e| WriteError::Write {
            path: relative.to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(path = relative, bytes = content.len(), "Updated {}", relative);
        Ok(target)
    }
}

/// Write to a sibling temp file, flush it, then rename over the target
///
/// A symlinked destination is written through to the file it points at,
/// and an existing file's permissions carry over to the replacement.
fn write_atomic(target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let target = match fs::symlink_metadata(target) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(target)?,
        _ => target.to_path_buf(),
    };
    let existing = fs::metadata(&target).ok();

    let mut temp_name = target
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    temp_name.push(TEMP_SUFFIX);
    let temp = target.with_file_name(temp_name);

    let result = (|| {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        if let Some(meta) = &existing {
            fs::set_permissions(&temp, meta.permissions())?;
        }
        fs::rename(&temp, &target)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }

    result
}
