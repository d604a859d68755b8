//! Export a course's working table to CSV

use crate::core::models::CourseResult;
use crate::debug;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Column header of the per-group table
const TABLE_HEADER: &str = "Category,Mean Sum,Student Score Sum,Total Sum,Dropped,Weight,Weighted Percentage (Course Avg),Weighted Percentage (Student Grade),Zero Total";

/// Trait for writing a graded course to an output file
pub trait CourseExporter {
    /// Export one course result
    ///
    /// # Errors
    /// Returns an error if export fails
    fn export(&self, result: &CourseResult, output_path: &Path) -> Result<(), Box<dyn Error>>;
}

/// CSV exporter for course results
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    /// Decimal places for numeric cells
    pub precision: usize,
}

impl CourseExporter for CsvExporter {
    fn export(&self, result: &CourseResult, output_path: &Path) -> Result<(), Box<dyn Error>> {
        export_course_csv(result, output_path, self.precision)
    }
}

/// Quote a field if it contains a delimiter, a quote or a line break
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Render a course result as CSV text
///
/// A short header block (course name, both grand totals, portal grade) is
/// followed by a blank line and one row per assignment group.
#[must_use]
pub fn render_course_csv(result: &CourseResult, precision: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Course,{}", csv_field(&result.course_name));
    let _ = writeln!(out, "Course Average,{:.precision$}", result.course_average);
    let _ = writeln!(out, "Student Grade,{:.precision$}", result.student_grade);
    let _ = writeln!(
        out,
        "Grade on Canvas,{}",
        csv_field(result.portal_reported_grade.as_deref().unwrap_or(""))
    );
    out.push('\n');

    out.push_str(TABLE_HEADER);
    out.push('\n');

    for row in &result.per_category {
        debug!("Exporting group '{}'", row.category);
        let _ = writeln!(
            out,
            "{},{:.p$},{:.p$},{:.p$},{},{:.p$},{:.p$},{:.p$},{}",
            csv_field(&row.category),
            row.summed_mean,
            row.summed_student_score,
            row.summed_total,
            row.dropped_count,
            row.weight,
            row.weighted_course_pct,
            row.weighted_student_pct,
            row.zero_total,
            p = precision
        );
    }

    out
}

/// Write a course result to a CSV file, creating parent directories
///
/// # Errors
/// Returns an error if the directory or file cannot be written
pub fn export_course_csv<P: AsRef<Path>>(
    result: &CourseResult,
    output_path: P,
    precision: usize,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(output_path, render_course_csv(result, precision))?;
    Ok(())
}
