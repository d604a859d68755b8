//! Report generation for computed course grades
//!
//! A report covers every course given to it: the summary figures, the
//! per-group working table and any groups flagged by the zero-total policy.
//! Numbers are formatted once into a view model so every output format shows
//! the same digits.

pub mod formats;

use crate::core::models::{CategorySummary, CourseOutcome, CourseResult};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Title used when none is given
pub const DEFAULT_TITLE: &str = "Course Grades Report";

/// Data context for report generation
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Outcomes in the order the pages were given
    pub outcomes: &'a [CourseOutcome],
    /// Decimal places for every number in the report
    pub precision: usize,
    /// Report heading
    pub title: String,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context with the default title
    #[must_use]
    pub fn new(outcomes: &'a [CourseOutcome], precision: usize) -> Self {
        Self {
            outcomes,
            precision,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Replace the report heading
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Number of courses that were aggregated
    #[must_use]
    pub fn graded_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result().is_some())
            .count()
    }

    /// Build the preformatted view of every course
    #[must_use]
    pub fn course_views(&self) -> Vec<CourseView> {
        self.outcomes
            .iter()
            .map(|outcome| CourseView::from_outcome(outcome, self.precision))
            .collect()
    }
}

/// One course, with every number already formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseView {
    /// Course name
    pub name: String,
    /// Whether the course was aggregated
    pub graded: bool,
    /// Grade the portal shows, or `-`
    pub portal_grade: String,
    /// Weighted class average
    pub course_average: String,
    /// Weighted student grade
    pub student_grade: String,
    /// Dropped assignments across all groups
    pub dropped: usize,
    /// Per-group rows
    pub rows: Vec<CategoryView>,
    /// Comma-separated names of groups with nothing graded yet
    pub flagged: String,
}

impl CourseView {
    fn from_outcome(outcome: &CourseOutcome, precision: usize) -> Self {
        match outcome {
            CourseOutcome::Graded(result) => Self::from_result(result, precision),
            CourseOutcome::Unweighted { course_name } => Self {
                name: course_name.clone(),
                graded: false,
                portal_grade: "-".to_string(),
                course_average: "-".to_string(),
                student_grade: "-".to_string(),
                dropped: 0,
                rows: Vec::new(),
                flagged: String::new(),
            },
        }
    }

    fn from_result(result: &CourseResult, precision: usize) -> Self {
        Self {
            name: result.course_name.clone(),
            graded: true,
            portal_grade: result
                .portal_reported_grade
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            course_average: format!("{:.precision$}", result.course_average),
            student_grade: format!("{:.precision$}", result.student_grade),
            dropped: result.dropped_count(),
            rows: result
                .per_category
                .iter()
                .map(|row| CategoryView::from_summary(row, precision))
                .collect(),
            flagged: result.flagged_categories().collect::<Vec<_>>().join(", "),
        }
    }
}

/// One assignment group row, preformatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    /// Group name
    pub category: String,
    /// Group weight
    pub weight: String,
    /// Sum of class means
    pub mean: String,
    /// Sum of student scores
    pub student: String,
    /// Sum of points possible
    pub total: String,
    /// Counted assignments
    pub graded: usize,
    /// Dropped assignments
    pub dropped: usize,
    /// Weighted class percentage
    pub course_pct: String,
    /// Weighted student percentage
    pub student_pct: String,
    /// Hit the zero-total policy
    pub zero_total: bool,
}

impl CategoryView {
    fn from_summary(row: &CategorySummary, precision: usize) -> Self {
        Self {
            category: row.category.clone(),
            weight: format!("{:.precision$}", row.weight),
            mean: format!("{:.precision$}", row.summed_mean),
            student: format!("{:.precision$}", row.summed_student_score),
            total: format!("{:.precision$}", row.summed_total),
            graded: row.graded_count,
            dropped: row.dropped_count,
            course_pct: format!("{:.precision$}", row.weighted_course_pct),
            student_pct: format!("{:.precision$}", row.weighted_student_pct),
            zero_total: row.zero_total,
        }
    }
}

/// Plain-text working table for terminal output
///
/// ```text
/// Category     Weight   Mean  Score  Total  Dropped  Avg %  Grade %
/// Homework      50.00  23.00  27.00  30.00        1  38.33    45.00
/// ```
#[must_use]
pub fn category_table(result: &CourseResult, precision: usize) -> String {
    let width = result
        .per_category
        .iter()
        .map(|row| row.category.chars().count())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<width$}  {:>8}  {:>8}  {:>8}  {:>8}  {:>7}  {:>8}  {:>8}",
        "Category", "Weight", "Mean", "Score", "Total", "Dropped", "Avg %", "Grade %"
    );

    for row in &result.per_category {
        let _ = writeln!(
            table,
            "{:<width$}  {:>8.p$}  {:>8.p$}  {:>8.p$}  {:>8.p$}  {:>7}  {:>8.p$}  {:>8.p$}{}",
            row.category,
            row.weight,
            row.summed_mean,
            row.summed_student_score,
            row.summed_total,
            row.dropped_count,
            row.weighted_course_pct,
            row.weighted_student_pct,
            if row.zero_total { "  (no graded work)" } else { "" },
            p = precision
        );
    }

    table
}

/// Write rendered report content, creating missing parent directories
///
/// # Errors
/// Returns an error if the directory or file cannot be written
pub fn write_report(output_path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path, content)?;
    Ok(())
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
