//! The open document and the directory it lives in.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::buffer::DisplayBuffer;

pub const UNTITLED: &str = "untitled.py";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Cannot load file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot save file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open directory '{path}': {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document has no file path yet")]
    NoPath,
}

/// Editor buffer plus the file it was loaded from or saved to.
#[derive(Debug, Default)]
pub struct Document {
    buffer: DisplayBuffer,
    path: Option<PathBuf>,
}

impl Document {
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut DisplayBuffer {
        &mut self.buffer
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name shown on the tab.
    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }
}

/// One regular file in the explorer listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerEntry {
    pub name: String,
    pub path: PathBuf,
}

pub struct Workspace {
    root: PathBuf,
    document: Document,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            document: Document::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Start an empty, untitled document.
    pub fn new_document(&mut self) {
        self.document = Document::default();
    }

    /// Replace the document with the contents of `path`.
    ///
    /// On failure the current document is left untouched.
    pub fn open(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        let path = self.resolve(path);
        let bytes = fs::read(&path).map_err(|source| WorkspaceError::Read {
            path: path.clone(),
            source,
        })?;
        self.document.buffer.set_text(String::from_utf8_lossy(&bytes));
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Document loaded");
        self.document.path = Some(path);
        Ok(())
    }

    /// Write the document to `path` and make that its path.
    pub fn save_as(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        let path = self.resolve(path);
        fs::write(&path, self.document.buffer.text()).map_err(|source| WorkspaceError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Document saved");
        self.document.path = Some(path);
        Ok(())
    }

    /// Write the document back to its own path.
    pub fn save(&mut self) -> Result<(), WorkspaceError> {
        let path = self.document.path.clone().ok_or(WorkspaceError::NoPath)?;
        self.save_as(&path)
    }

    /// Regular files directly under the workspace root, sorted by name.
    pub fn list_files(&self) -> Result<Vec<ExplorerEntry>, WorkspaceError> {
        let list_err = |source: std::io::Error| WorkspaceError::ListDir {
            path: self.root.clone(),
            source,
        };
        let root = fs::canonicalize(&self.root).map_err(list_err)?;

        let mut entries = Vec::new();
        for entry in fs::read_dir(&root).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            // Follows symlinks, like a plain `stat`.
            if !entry.path().is_file() {
                continue;
            }
            entries.push(ExplorerEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: root.join(entry.file_name()),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
