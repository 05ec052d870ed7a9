use crate::constants::{FAILURE_PREFIX, SUCCESS_PREFIX, SUMMARY_SEPARATOR_WIDTH};
use crate::processing::ConversionOutcome;
use crate::utils::{format_file_size, format_percent_change, format_with_separators};
use std::io::{self, Write};
use std::path::Path;

/// Run totals, folded over outcomes in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub animated: usize,
    pub static_images: usize,
    /// Bytes of successfully converted sources
    pub original_bytes: u64,
    /// Bytes of the WebP files written
    pub converted_bytes: u64,
    pub deleted_originals: usize,
    pub warnings: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &ConversionOutcome) {
        match outcome.converted() {
            Some(converted) => {
                self.succeeded += 1;
                if converted.animated {
                    self.animated += 1;
                } else {
                    self.static_images += 1;
                }
                self.original_bytes += converted.original_size;
                self.converted_bytes += converted.converted_size;
                if converted.original_deleted {
                    self.deleted_originals += 1;
                }
            }
            None => self.failed += 1,
        }

        if outcome.warning.is_some() {
            self.warnings += 1;
        }
    }

    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a ConversionOutcome>) -> Self {
        outcomes.into_iter().fold(Self::default(), |mut summary, outcome| {
            summary.record(outcome);
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn totals_line(&self) -> String {
        format!(
            "Success: {} (Animated: {}, Static: {}), Errors: {}",
            self.succeeded, self.animated, self.static_images, self.failed
        )
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Status lines for one outcome, without trailing newlines.
pub fn outcome_lines(outcome: &ConversionOutcome) -> Vec<String> {
    let source = display_name(&outcome.source);

    let converted = match &outcome.result {
        Ok(converted) => converted,
        Err(e) => {
            return vec![format!("{} Failed to convert {}: {}", FAILURE_PREFIX, source, e)];
        }
    };

    let label = if converted.animated {
        format!("animated {}", outcome.kind)
    } else {
        outcome.kind.to_string()
    };

    let mut lines = vec![
        format!(
            "{} Converted ({}): {} -> {}",
            SUCCESS_PREFIX,
            label,
            source,
            display_name(&outcome.destination)
        ),
        format!(
            "  Size: {} bytes -> {} bytes ({} change)",
            format_with_separators(converted.original_size),
            format_with_separators(converted.converted_size),
            format_percent_change(converted.original_size, converted.converted_size)
        ),
    ];

    if converted.original_deleted {
        lines.push("  Deleted original file".to_string());
    }
    if let Some(warning) = &outcome.warning {
        lines.push(format!("  Warning: {}", warning));
    }

    lines
}

/// The closing block, printed even when every file failed.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let separator = "=".repeat(SUMMARY_SEPARATOR_WIDTH);
    let mut lines = vec![
        String::new(),
        separator.clone(),
        "Conversion complete!".to_string(),
        summary.totals_line(),
    ];

    if summary.succeeded > 0 {
        lines.push(format!(
            "Total size: {} -> {} ({} change)",
            format_file_size(summary.original_bytes),
            format_file_size(summary.converted_bytes),
            format_percent_change(summary.original_bytes, summary.converted_bytes)
        ));
    }
    if summary.deleted_originals > 0 {
        lines.push(format!("Deleted originals: {}", summary.deleted_originals));
    }
    if summary.warnings > 0 {
        lines.push(format!("Warnings: {}", summary.warnings));
    }

    lines.push(separator);
    lines
}

/// Streams per-file lines to `out` while accumulating the run summary.
pub struct Reporter<W: Write> {
    out: W,
    show_files: bool,
    summary: RunSummary,
}

impl<W: Write> Reporter<W> {
    /// With `show_files` off only the closing summary is written.
    pub fn new(out: W, show_files: bool) -> Self {
        Self {
            out,
            show_files,
            summary: RunSummary::default(),
        }
    }

    /// Writes a free-form line (run header, notices) when file output is on.
    pub fn note(&mut self, line: &str) -> io::Result<()> {
        if self.show_files {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    pub fn report(&mut self, outcome: &ConversionOutcome) -> io::Result<()> {
        self.summary.record(outcome);
        if self.show_files {
            for line in outcome_lines(outcome) {
                writeln!(self.out, "{}", line)?;
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Writes the summary block and hands back the totals.
    pub fn finish(mut self) -> io::Result<RunSummary> {
        for line in summary_lines(&self.summary) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(self.summary)
    }
}
