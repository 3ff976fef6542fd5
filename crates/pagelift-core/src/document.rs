use crate::backend::PageResult;

/// The literal separator between page segments in rendered output.
pub const PAGE_BREAK: &str = "\n\n--- PAGE BREAK ---\n\n";

/// Text recovered from one page of a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    /// Text as reported by the backend; empty when the page has no text
    /// content at all.
    Extracted(String),
    /// The page failed to extract. Renders as a placeholder so the page
    /// still occupies its position in the output.
    Failed(String),
}

impl PageText {
    /// The segment this page contributes to the rendered document.
    pub fn segment(&self) -> String {
        match self {
            PageText::Extracted(text) => text.clone(),
            PageText::Failed(message) => format!("[error extracting page: {}]", message),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageText::Failed(_))
    }
}

/// All pages of one source document, in page order.
///
/// Constructed transiently, rendered once, written once; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pages: Vec<PageText>,
}

impl ExtractedDocument {
    /// Build from per-page extraction outcomes, converting failures into
    /// placeholder pages.
    pub fn from_pages(pages: Vec<PageResult>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| match page {
                Ok(text) => PageText::Extracted(text),
                Err(error) => PageText::Failed(error.message),
            })
            .collect();
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of pages that will render as a placeholder instead of text.
    pub fn failed_page_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_failed()).count()
    }

    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    /// Join all page segments with [`PAGE_BREAK`].
    ///
    /// Splitting the result on [`PAGE_BREAK`] yields exactly one segment per
    /// page, failed pages included. A single-page document renders with no
    /// separator at all.
    pub fn render(&self) -> String {
        let segments: Vec<String> = self.pages.iter().map(PageText::segment).collect();
        segments.join(PAGE_BREAK)
    }
}
