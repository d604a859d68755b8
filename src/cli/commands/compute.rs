//! Compute command handler

use super::{ensure_dir, input_stem};
use course_mean::config::Config;
use course_mean::core::export::{CourseExporter, CsvExporter};
use course_mean::core::models::{CourseOutcome, CourseResult};
use course_mean::core::pipeline::{self, BatchEntry};
use course_mean::core::report::category_table;
use course_mean::{error, info, verbose};
use std::path::{Path, PathBuf};

/// Run the compute command for one or more saved grades pages.
///
/// # Arguments
/// * `input_files` - Saved grades pages
/// * `csv` - Whether to export each weighted course's table
/// * `output_files` - Optional CSV paths; must match inputs 1:1 when provided
/// * `config` - Configuration holding the exports directory and precision
pub fn run(input_files: &[PathBuf], csv: bool, output_files: &[PathBuf], config: &Config) {
    if input_files.is_empty() {
        eprintln!("✗ No input files provided.");
        return;
    }

    if !output_files.is_empty() && output_files.len() != input_files.len() {
        eprintln!(
            "✗ When using -o/--output, provide one output path per input file ({} inputs, {} outputs).",
            input_files.len(),
            output_files.len()
        );
        return;
    }

    let precision = config.display.precision;
    let entries = pipeline::compute_files(input_files, |pct| {
        verbose!("Computing {pct:.0}%");
    });

    for (idx, entry) in entries.iter().enumerate() {
        if let Err(err) = show_entry(entry, precision) {
            error!("Compute failed for {}: {err}", entry.path.display());
            eprintln!("{err}");
            continue;
        }

        let Ok(CourseOutcome::Graded(result)) = &entry.outcome else {
            continue;
        };
        if csv {
            let output_file = output_files.get(idx).map(PathBuf::as_path);
            if let Err(err) = export_single(&entry.path, result, output_file, config) {
                error!("CSV export failed for {}: {err}", entry.path.display());
                eprintln!("{err}");
            }
        }
    }
}

/// Print one document's summary and working table
fn show_entry(entry: &BatchEntry, precision: usize) -> Result<(), String> {
    let outcome = entry
        .outcome
        .as_ref()
        .map_err(|e| format!("✗ Failed to compute {}: {e}", entry.path.display()))?;

    info!("Computed {}", entry.path.display());
    println!();
    print!("{}", outcome.summary(precision));

    match outcome {
        CourseOutcome::Graded(result) => {
            verbose!("Source: {}", entry.path.display());
            print!("{}", category_table(result, precision));
        }
        CourseOutcome::Unweighted { course_name } => {
            info!("'{course_name}' has no weighted groups; nothing to compute");
        }
    }

    Ok(())
}

fn export_single(
    input_file: &Path,
    result: &CourseResult,
    output_file: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    let final_output_path = if let Some(output) = output_file {
        output.to_path_buf()
    } else {
        let out_dir = ensure_dir(Path::new(&config.paths.exports_dir), "exports")?;
        out_dir.join(format!("{}_grades.csv", input_stem(input_file)))
    };

    let exporter = CsvExporter {
        precision: config.display.precision,
    };
    exporter.export(result, &final_output_path).map_err(|e| {
        format!(
            "✗ Failed to export grades to {}: {e}",
            final_output_path.display()
        )
    })?;

    println!("✓ Grades exported to: {}", final_output_path.display());
    info!("Exported course table to: {}", final_output_path.display());
    Ok(())
}
