//! Report command handler
//!
//! Renders every given course into a single Markdown or HTML report.

use super::{ensure_dir, input_stem};
use course_mean::config::Config;
use course_mean::core::models::CourseOutcome;
use course_mean::core::pipeline;
use course_mean::core::report::{ReportContext, ReportFormat, ReportGenerator};
use course_mean::{error, info, verbose};
use std::path::{Path, PathBuf};

/// Run the report command.
///
/// # Arguments
/// * `input_files` - Saved grades pages
/// * `output_file` - Optional output path
/// * `format` - Report format
/// * `config` - Configuration holding the reports directory and precision
pub fn run(
    input_files: &[PathBuf],
    output_file: Option<&Path>,
    format: ReportFormat,
    config: &Config,
) {
    match generate_report(input_files, output_file, format, config) {
        Ok(report_path) => println!("✓ Report generated: {}", report_path.display()),
        Err(err) => {
            error!("Report generation failed: {err}");
            eprintln!("{err}");
        }
    }
}

/// Compute every page and keep the outcomes that succeeded
fn collect_outcomes(input_files: &[PathBuf]) -> Vec<CourseOutcome> {
    let entries = pipeline::compute_files(input_files, |pct| {
        verbose!("Computing {pct:.0}%");
    });

    entries
        .into_iter()
        .filter_map(|entry| match entry.outcome {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("Skipping {} in report: {e}", entry.path.display());
                eprintln!("✗ Failed to compute {}: {e}", entry.path.display());
                None
            }
        })
        .collect()
}

fn generate_report(
    input_files: &[PathBuf],
    output_file: Option<&Path>,
    format: ReportFormat,
    config: &Config,
) -> Result<PathBuf, String> {
    let first = input_files
        .first()
        .ok_or_else(|| "✗ No input files provided.".to_string())?;

    let outcomes = collect_outcomes(input_files);
    if outcomes.is_empty() {
        return Err("✗ None of the given pages could be computed; no report written".to_string());
    }

    let output_path = if let Some(path) = output_file {
        path.to_path_buf()
    } else {
        let reports_dir = ensure_dir(Path::new(&config.paths.reports_dir), "reports")?;
        reports_dir.join(format!("{}_report.{}", input_stem(first), format.extension()))
    };

    let ctx = ReportContext::new(&outcomes, config.display.precision);
    format
        .generator()
        .generate(&ctx, &output_path)
        .map_err(|e| format!("✗ Failed to write {format} report: {e}"))?;

    info!(
        "Wrote {format} report for {} courses to {}",
        outcomes.len(),
        output_path.display()
    );
    Ok(output_path)
}
