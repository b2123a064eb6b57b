//! Document model - the persisted delimited text and its file state

use ropey::Rope;
use std::path::{Path, PathBuf};

/// The host-side document a sheet editor is bound to.
///
/// The text is the only persisted state; everything the grid shows is
/// derived from it.
pub trait DocumentContext {
    fn text(&self) -> String;

    /// Replace the whole text (after a grid edit)
    fn set_text(&mut self, text: &str);

    /// File the document was loaded from, used to pin the delimiter
    fn path(&self) -> Option<&Path>;

    /// Whether the host finished loading the document
    fn is_ready(&self) -> bool;
}

/// In-memory document backed by a rope buffer
#[derive(Debug, Clone)]
pub struct TextDocument {
    /// The text buffer
    pub buffer: Rope,
    /// Path to the file on disk (None for in-memory documents)
    pub file_path: Option<PathBuf>,
    /// Whether the buffer has changes not yet written to disk
    pub is_modified: bool,
    /// Incremented on each `set_text` that changes the buffer
    pub revision: u64,
    ready: bool,
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDocument {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a ready document with initial text
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            file_path: None,
            is_modified: false,
            revision: 0,
            ready: true,
        }
    }

    /// Attach a path, e.g. so the `.csv`/`.tsv` extension pins the delimiter
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Load a document from a file path
    pub fn from_file(path: PathBuf) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(&path)?;
        Ok(Self::with_text(&content).with_path(path))
    }

    /// A document the host has not finished loading yet
    pub fn pending() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Write the buffer back to `file_path`
    pub fn save(&mut self) -> Result<(), std::io::Error> {
        let Some(path) = self.file_path.as_ref() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "document has no file path",
            ));
        };
        std::fs::write(path, self.buffer.to_string())?;
        self.is_modified = false;
        tracing::info!("Saved {}", path.display());
        Ok(())
    }
}

impl DocumentContext for TextDocument {
    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn set_text(&mut self, text: &str) {
        if self.buffer == text {
            return;
        }
        self.buffer = Rope::from(text);
        self.is_modified = true;
        self.revision += 1;
    }

    fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
