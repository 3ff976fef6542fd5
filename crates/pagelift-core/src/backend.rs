use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page-scoped extraction failure.
///
/// Recoverable by contract: the exporter substitutes a visible placeholder
/// segment for the page and continues with the rest of the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PageError {
    pub message: String,
}

impl PageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of extracting text from a single page.
pub type PageResult = Result<String, PageError>;

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level page-by-page text extraction; the
/// export pipeline (placeholder substitution, page joining, file writing)
/// lives in [`crate::exporter::Exporter`].
pub trait PdfBackend: Send + Sync {
    /// Open `path` and extract the text of every page, in page order.
    ///
    /// A failure to open the document fails the whole call. A failure on a
    /// single page must not: each page carries its own [`PageResult`], and
    /// the returned vector has exactly one entry per page of the document.
    /// A page with no text content (e.g. a scanned image) is `Ok` with an
    /// empty string, not an error.
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageResult>, BackendError>;
}
