use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::discovery::{discover_images, DiscoveredFile};
use crate::error::{ConversionError, Result};
use crate::formats::TypeFilter;
use crate::logger::is_quiet;
use crate::options::ConversionRequest;
use crate::processing::{convert_file, ConversionOutcome};
use crate::report::{Reporter, RunSummary};
use crate::verbose;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;

/// Converts every matching image under the request's input directory.
///
/// Per-file failures are reported and counted; only startup problems
/// (missing input directory, uncreatable output directory) return an error.
///
/// # Returns
/// * `Ok(RunSummary)` - Totals for the run, also printed to stdout
/// * `Err(ConversionError)` - A fatal error raised before any file was converted
pub fn run_conversion(request: &ConversionRequest) -> Result<RunSummary> {
    let files = discover_images(request.input_dir(), request.type_filter, request.recursive)?;

    fs::create_dir_all(request.output_dir())
        .map_err(|_| ConversionError::DirectoryCreationFailed(request.output_dir().to_path_buf()))?;

    verbose!("Input: {}", files.root().display());
    verbose!("Output: {}", request.output_dir().display());

    let files: Vec<DiscoveredFile> = files.collect();
    convert_all(&files, request, io::stdout())
}

/// Converts an already discovered list of files and writes the report to `out`.
pub fn convert_all<W: Write>(
    files: &[DiscoveredFile],
    request: &ConversionRequest,
    out: W,
) -> Result<RunSummary> {
    let mut reporter = Reporter::new(out, !is_quiet());
    let type_label = type_label(request.type_filter);

    if files.is_empty() {
        reporter.note(&format!("No {}files found in the specified directory.", type_label))?;
        return Ok(reporter.finish()?);
    }

    write_header(&mut reporter, files.len(), &type_label, request)?;

    let start_time = Instant::now();
    let progress = create_progress_bar(files.len());

    if request.is_parallel() {
        verbose!("Using {} worker threads", request.threads);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(request.threads)
            .build()?;

        // Outcomes come back in discovery order regardless of completion order.
        let outcomes: Vec<ConversionOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let outcome = convert_file(file, request);
                    progress.inc(1);
                    outcome
                })
                .collect()
        });

        for outcome in &outcomes {
            progress.suspend(|| reporter.report(outcome))?;
        }
    } else {
        for file in files {
            progress.set_message(file.relative_path.display().to_string());
            let outcome = convert_file(file, request);
            progress.suspend(|| reporter.report(&outcome))?;
            progress.inc(1);
        }
    }

    progress.finish_and_clear();
    verbose!("Total time: {:?}", start_time.elapsed());

    Ok(reporter.finish()?)
}

/// `"GIF "` style prefix for messages; empty when every type is selected.
fn type_label(type_filter: TypeFilter) -> String {
    match type_filter {
        TypeFilter::All => String::new(),
        other => format!("{} ", other.to_string().to_uppercase()),
    }
}

fn write_header<W: Write>(
    reporter: &mut Reporter<W>,
    file_count: usize,
    type_label: &str,
    request: &ConversionRequest,
) -> io::Result<()> {
    reporter.note(&format!("Found {} {}file(s) to convert", file_count, type_label))?;
    reporter.note(&format!(
        "Settings: quality={}, lossless={}, method={}, preserve_animation={}",
        request.encode.quality,
        request.encode.lossless,
        request.encode.method,
        request.preserve_animation
    ))?;
    if request.type_filter.includes_gif() {
        reporter.note("Note: GIF animations will be preserved unless --no-animation is used")?;
    }
    reporter.note("")
}

fn create_progress_bar(total: usize) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        progress.set_style(style.progress_chars("#>-"));
    }
    progress
}
