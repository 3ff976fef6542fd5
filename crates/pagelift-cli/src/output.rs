use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the line for a source path that does not exist.
pub fn print_missing(w: &mut dyn Write, source: &Path, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Missing:".yellow(), source.display())?;
    } else {
        writeln!(w, "Missing: {}", source.display())?;
    }
    Ok(())
}

/// Print the line for a written output file.
pub fn print_wrote(w: &mut dyn Write, output: &Path, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Wrote:".green(), output.display())?;
    } else {
        writeln!(w, "Wrote: {}", output.display())?;
    }
    Ok(())
}

/// Print the line for a source skipped because it could not be opened.
pub fn print_skipped(
    w: &mut dyn Write,
    source: &Path,
    error: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {} ({})", "Skipped:".yellow(), source.display(), error)?;
    } else {
        writeln!(w, "Skipped: {} ({})", source.display(), error)?;
    }
    Ok(())
}

/// Print the final line of a completed run.
pub fn print_done(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "Done".bold().green())?;
    } else {
        writeln!(w, "Done")?;
    }
    Ok(())
}
