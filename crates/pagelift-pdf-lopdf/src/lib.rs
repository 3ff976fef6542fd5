use std::path::Path;

use lopdf::Document;

use pagelift_core::{BackendError, PageError, PageResult, PdfBackend};

/// lopdf-based implementation of [`PdfBackend`].
///
/// This crate isolates the PDF parser behind the backend trait so that the
/// rest of the workspace stays parser-agnostic. lopdf is pure Rust, so there
/// is no native library to link.
///
/// Text is extracted one page at a time: a malformed content stream surfaces
/// as a failed entry for that page only, and the remaining pages still come
/// through.
#[derive(Debug, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for LopdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageResult>, BackendError> {
        let document = Document::load(path).map_err(|e| BackendError::OpenError(e.to_string()))?;

        if document.is_encrypted() {
            return Err(BackendError::OpenError(
                "document is encrypted".to_string(),
            ));
        }

        // get_pages() keys are 1-based page numbers in document order.
        let mut pages = Vec::new();
        for page_number in document.get_pages().keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => pages.push(Ok(text)),
                Err(e) => pages.push(Err(PageError::new(e.to_string()))),
            }
        }

        Ok(pages)
    }
}
