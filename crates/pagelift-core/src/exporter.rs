use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::backend::{BackendError, PdfBackend};
use crate::document::ExtractedDocument;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot resolve output directory: {0}")]
    OutDir(String),
}

/// Where output files land.
#[derive(Debug, Clone, Default)]
pub enum OutDir {
    /// The directory containing the running executable (the tool's default,
    /// matching "next to the program itself").
    #[default]
    BesideExecutable,
    /// A caller-chosen directory, created if absent.
    Path(PathBuf),
}

impl OutDir {
    pub fn resolve(&self) -> Result<PathBuf, ExportError> {
        match self {
            OutDir::Path(dir) => Ok(dir.clone()),
            OutDir::BesideExecutable => {
                let exe = std::env::current_exe().map_err(|e| ExportError::OutDir(e.to_string()))?;
                exe.parent()
                    .map(Path::to_path_buf)
                    .ok_or_else(|| ExportError::OutDir("executable path has no parent".into()))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub out_dir: OutDir,
    /// Skip documents that fail to open instead of aborting the run.
    ///
    /// Off by default: an unreadable document ends the run with an error and
    /// later sources are not processed. Missing files and failed pages are
    /// always tolerated regardless of this flag.
    pub keep_going: bool,
}

/// Per-source progress events emitted by [`Exporter::export_all`].
#[derive(Debug, Clone)]
pub enum SourceEvent {
    /// The input path did not exist; nothing was written for it.
    Missing { source: PathBuf },
    /// One output file was written (placeholder segments included).
    Wrote {
        source: PathBuf,
        output: PathBuf,
        pages: usize,
        failed_pages: usize,
    },
    /// Opening failed and `keep_going` let the run continue.
    Skipped { source: PathBuf, error: String },
}

/// Counters for a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub written: usize,
    pub missing: usize,
    pub skipped: usize,
    pub pages: usize,
    pub failed_pages: usize,
}

/// Converts each source PDF into one `.txt` file of page text.
pub struct Exporter {
    backend: Box<dyn PdfBackend>,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(backend: impl PdfBackend + 'static, options: ExportOptions) -> Self {
        Self {
            backend: Box::new(backend),
            options,
        }
    }

    /// Process every source in order, sequentially.
    ///
    /// For each source: skip it if the path does not exist, otherwise open it
    /// through the backend, join the page texts with the page-break separator
    /// (failed pages become placeholder segments at their position), and
    /// overwrite `<out_dir>/<stem>.txt` with the result.
    ///
    /// An open failure propagates and ends the run unless `keep_going` is
    /// set; files already written stay on disk either way.
    pub fn export_all(
        &self,
        sources: &[PathBuf],
        mut on_event: impl FnMut(SourceEvent),
    ) -> Result<RunSummary, ExportError> {
        let out_dir = self.options.out_dir.resolve()?;
        std::fs::create_dir_all(&out_dir).map_err(|e| ExportError::Write {
            path: out_dir.clone(),
            source: e,
        })?;

        let mut summary = RunSummary::default();
        let mut seen_outputs: HashSet<PathBuf> = HashSet::new();

        for source in sources {
            if !source.exists() {
                summary.missing += 1;
                on_event(SourceEvent::Missing {
                    source: source.clone(),
                });
                continue;
            }

            let pages = match self.backend.extract_pages(source) {
                Ok(pages) => pages,
                Err(error) if self.options.keep_going => {
                    tracing::warn!(source = %source.display(), error = %error, "skipping unreadable document");
                    summary.skipped += 1;
                    on_event(SourceEvent::Skipped {
                        source: source.clone(),
                        error: error.to_string(),
                    });
                    continue;
                }
                Err(error) => return Err(error.into()),
            };

            for (index, page) in pages.iter().enumerate() {
                if let Err(error) = page {
                    tracing::debug!(source = %source.display(), page = index + 1, error = %error, "page extraction failed");
                }
            }

            let document = ExtractedDocument::from_pages(pages);
            let output = out_dir.join(output_file_name(source));
            if !seen_outputs.insert(output.clone()) {
                tracing::warn!(output = %output.display(), "output name collides with an earlier source; overwriting");
            }

            std::fs::write(&output, document.render()).map_err(|e| ExportError::Write {
                path: output.clone(),
                source: e,
            })?;

            summary.written += 1;
            summary.pages += document.page_count();
            summary.failed_pages += document.failed_page_count();
            on_event(SourceEvent::Wrote {
                source: source.clone(),
                output,
                pages: document.page_count(),
                failed_pages: document.failed_page_count(),
            });
        }

        tracing::debug!(
            written = summary.written,
            missing = summary.missing,
            skipped = summary.skipped,
            failed_pages = summary.failed_pages,
            "export complete"
        );
        Ok(summary)
    }
}

/// `<source stem>.txt`: the input's base name with its extension replaced.
fn output_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    format!("{}.txt", stem)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use super::*;
    use crate::backend::{PageError, PageResult};
    use crate::document::PAGE_BREAK;

    /// In-memory backend: path -> per-page outcomes. Paths with no entry
    /// fail to open, like a malformed container would.
    struct FakeBackend {
        docs: HashMap<PathBuf, Vec<PageResult>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                docs: HashMap::new(),
            }
        }

        fn with_doc(mut self, path: &Path, pages: Vec<PageResult>) -> Self {
            self.docs.insert(path.to_path_buf(), pages);
            self
        }
    }

    impl PdfBackend for FakeBackend {
        fn extract_pages(&self, path: &Path) -> Result<Vec<PageResult>, BackendError> {
            self.docs
                .get(path)
                .cloned()
                .ok_or_else(|| BackendError::OpenError(format!("unreadable: {}", path.display())))
        }
    }

    /// Create an empty file so the exporter's existence check passes.
    fn touch(path: &Path) {
        std::fs::write(path, b"%PDF-1.5").unwrap();
    }

    fn options_for(dir: &Path) -> ExportOptions {
        ExportOptions {
            out_dir: OutDir::Path(dir.to_path_buf()),
            keep_going: false,
        }
    }

    #[test]
    fn test_writes_joined_pages_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("greeting.pdf");
        touch(&source);

        let backend = FakeBackend::new().with_doc(
            &source,
            vec![Ok("Hello".to_string()), Ok("World".to_string())],
        );
        let exporter = Exporter::new(backend, options_for(dir.path()));

        let summary = exporter
            .export_all(std::slice::from_ref(&source), |_| {})
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("greeting.txt")).unwrap();
        assert_eq!(written, "Hello\n\n--- PAGE BREAK ---\n\nWorld");
        assert_eq!(summary.written, 1);
        assert_eq!(summary.pages, 2);
    }

    #[test]
    fn test_failed_page_becomes_placeholder_segment() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("partial.pdf");
        touch(&source);

        let backend = FakeBackend::new().with_doc(
            &source,
            vec![
                Ok("First".to_string()),
                Err(PageError::new("stream truncated")),
                Ok("Third".to_string()),
            ],
        );
        let exporter = Exporter::new(backend, options_for(dir.path()));

        let summary = exporter
            .export_all(std::slice::from_ref(&source), |_| {})
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("partial.txt")).unwrap();
        let segments: Vec<&str> = written.split(PAGE_BREAK).collect();
        assert_eq!(
            segments,
            vec!["First", "[error extracting page: stream truncated]", "Third"]
        );
        assert_eq!(summary.failed_pages, 1);
    }

    #[test]
    fn test_missing_source_is_skipped_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let ghost = dir.path().join("ghost.pdf");
        let real = dir.path().join("real.pdf");
        touch(&real);

        let backend = FakeBackend::new().with_doc(&real, vec![Ok("content".to_string())]);
        let exporter = Exporter::new(backend, options_for(dir.path()));

        let mut events = Vec::new();
        let summary = exporter
            .export_all(&[ghost.clone(), real.clone()], |e| events.push(e))
            .unwrap();

        assert!(!dir.path().join("ghost.txt").exists());
        assert!(dir.path().join("real.txt").exists());
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.written, 1);
        assert!(matches!(&events[0], SourceEvent::Missing { source } if *source == ghost));
        assert!(matches!(&events[1], SourceEvent::Wrote { .. }));
    }

    #[test]
    fn test_open_failure_aborts_run_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdf");
        let bad = dir.path().join("bad.pdf");
        let later = dir.path().join("later.pdf");
        touch(&good);
        touch(&bad);
        touch(&later);

        // `bad` and `later` have no backend entry; `later` is never reached.
        let backend = FakeBackend::new().with_doc(&good, vec![Ok("ok".to_string())]);
        let exporter = Exporter::new(backend, options_for(dir.path()));

        let result = exporter.export_all(&[good, bad, later], |_| {});

        assert!(matches!(
            result,
            Err(ExportError::Backend(BackendError::OpenError(_)))
        ));
        assert!(dir.path().join("good.txt").exists());
        assert!(!dir.path().join("later.txt").exists());
    }

    #[test]
    fn test_keep_going_skips_unreadable_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdf");
        let bad = dir.path().join("bad.pdf");
        let later = dir.path().join("later.pdf");
        touch(&good);
        touch(&bad);
        touch(&later);

        let backend = FakeBackend::new()
            .with_doc(&good, vec![Ok("ok".to_string())])
            .with_doc(&later, vec![Ok("also ok".to_string())]);
        let options = ExportOptions {
            out_dir: OutDir::Path(dir.path().to_path_buf()),
            keep_going: true,
        };
        let exporter = Exporter::new(backend, options);

        let mut events = Vec::new();
        let summary = exporter
            .export_all(&[good, bad.clone(), later], |e| events.push(e))
            .unwrap();

        assert_eq!(summary.written, 2);
        assert_eq!(summary.skipped, 1);
        assert!(!dir.path().join("bad.txt").exists());
        assert!(dir.path().join("later.txt").exists());
        assert!(matches!(&events[1], SourceEvent::Skipped { source, .. } if *source == bad));
    }

    #[test]
    fn test_rerun_overwrites_with_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("stable.pdf");
        touch(&source);

        let pages = vec![Ok("same text".to_string()), Ok("every run".to_string())];
        let backend = FakeBackend::new().with_doc(&source, pages.clone());
        let exporter = Exporter::new(backend, options_for(dir.path()));
        exporter
            .export_all(std::slice::from_ref(&source), |_| {})
            .unwrap();
        let first = std::fs::read(dir.path().join("stable.txt")).unwrap();

        // Poison the output, then run again with a fresh exporter.
        std::fs::write(dir.path().join("stable.txt"), b"stale leftovers").unwrap();
        let backend = FakeBackend::new().with_doc(&source, pages);
        let exporter = Exporter::new(backend, options_for(dir.path()));
        exporter
            .export_all(std::slice::from_ref(&source), |_| {})
            .unwrap();
        let second = std::fs::read(dir.path().join("stable.txt")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_output_name_strips_only_last_extension() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("report.v2.pdf");
        touch(&source);

        let backend = FakeBackend::new().with_doc(&source, vec![Ok("r".to_string())]);
        let exporter = Exporter::new(backend, options_for(dir.path()));
        exporter
            .export_all(std::slice::from_ref(&source), |_| {})
            .unwrap();

        assert!(dir.path().join("report.v2.txt").exists());
    }

    #[test]
    fn test_same_stem_sources_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let sub_a = dir.path().join("a");
        let sub_b = dir.path().join("b");
        std::fs::create_dir_all(&sub_a).unwrap();
        std::fs::create_dir_all(&sub_b).unwrap();
        let first = sub_a.join("doc.pdf");
        let second = sub_b.join("doc.pdf");
        touch(&first);
        touch(&second);

        let out = dir.path().join("out");
        let backend = FakeBackend::new()
            .with_doc(&first, vec![Ok("from a".to_string())])
            .with_doc(&second, vec![Ok("from b".to_string())]);
        let exporter = Exporter::new(backend, options_for(&out));
        exporter.export_all(&[first, second], |_| {}).unwrap();

        let written = std::fs::read_to_string(out.join("doc.txt")).unwrap();
        assert_eq!(written, "from b");
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc.pdf");
        touch(&source);

        let out = dir.path().join("nested").join("exports");
        let backend = FakeBackend::new().with_doc(&source, vec![Ok("text".to_string())]);
        let exporter = Exporter::new(backend, options_for(&out));
        exporter
            .export_all(std::slice::from_ref(&source), |_| {})
            .unwrap();

        assert!(out.join("doc.txt").exists());
    }

    #[test]
    fn test_default_out_dir_is_beside_the_executable() {
        let resolved = OutDir::BesideExecutable.resolve().unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(Some(resolved.as_path()), exe.parent());
    }
}
