use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser;

use pagelift_core::config_file;
use pagelift_core::exporter::{ExportOptions, Exporter, OutDir, SourceEvent};
use pagelift_pdf_lopdf::LopdfBackend;

mod output;

use output::ColorMode;

/// Batch PDF text extraction - one .txt file per source PDF
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// PDF files to process (falls back to `sources` from the config file)
    sources: Vec<PathBuf>,

    /// Directory for the .txt files (default: next to this executable)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Read configuration from a specific TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip PDFs that fail to open instead of stopping the run
    #[arg(long)]
    keep_going: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the per-file result lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let file_config = match cli.config {
        Some(ref path) => config_file::load_from_path(path).ok_or_else(|| {
            anyhow::anyhow!("could not read config file: {}", path.display())
        })?,
        None => config_file::load_config(),
    };

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let sources = if cli.sources.is_empty() {
        file_config.sources.clone().unwrap_or_default()
    } else {
        cli.sources.clone()
    };
    if sources.is_empty() {
        anyhow::bail!(
            "no input files: pass PDF paths on the command line or set `sources` in .pagelift.toml"
        );
    }

    let out_dir = cli
        .out_dir
        .clone()
        .or_else(|| std::env::var("PAGELIFT_OUT_DIR").ok().map(PathBuf::from))
        .or_else(|| file_config.output.as_ref().and_then(|o| o.dir.clone()))
        .map(OutDir::Path)
        .unwrap_or_default();

    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let color = ColorMode(use_color);

    let exporter = Exporter::new(
        LopdfBackend::new(),
        ExportOptions {
            out_dir,
            keep_going: cli.keep_going,
        },
    );

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    exporter.export_all(&sources, |event| match event {
        SourceEvent::Missing { source } => {
            let _ = output::print_missing(&mut stdout, &source, color);
            let _ = stdout.flush();
        }
        SourceEvent::Wrote { output: path, .. } => {
            let _ = output::print_wrote(&mut stdout, &path, color);
            let _ = stdout.flush();
        }
        SourceEvent::Skipped { source, error } => {
            let _ = output::print_skipped(&mut stderr, &source, &error, color);
            let _ = stderr.flush();
        }
    })?;

    output::print_done(&mut stdout, color)?;
    Ok(())
}
