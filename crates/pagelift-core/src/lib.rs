pub mod backend;
pub mod config_file;
pub mod document;
pub mod exporter;

// Re-export for convenience
pub use backend::{BackendError, PageError, PageResult, PdfBackend};
pub use document::{ExtractedDocument, PAGE_BREAK, PageText};
pub use exporter::{ExportError, ExportOptions, Exporter, OutDir, RunSummary, SourceEvent};
