//! Grades page extractor
//!
//! Reads one rendered grades page into the course name, the group weight
//! table and one [`AssignmentRecord`] per submission row.

use super::rows::{self, RowKind};
use crate::core::error::{GradeError, Landmark};
use crate::core::models::{AssignmentRecord, CategoryWeights};
use crate::{debug, warn};
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Label of the weight table's closing row, which is not a group
const WEIGHT_TOTAL_LABEL: &str = "Total";

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

static BREADCRUMBS: LazyLock<Selector> = LazyLock::new(|| selector("#breadcrumbs"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static WEIGHTS_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("#assignments-not-weighted"));
static GRADES_SUMMARY: LazyLock<Selector> = LazyLock::new(|| selector("#grades_summary"));
static TBODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static DATA_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// Everything the extractor takes from one grades page
#[derive(Debug, Clone, PartialEq)]
pub struct GradesPage {
    /// Course name from the third breadcrumb
    pub course_name: String,
    /// Group weights; `None` when the course is not weighted
    pub weights: Option<CategoryWeights>,
    /// Submission records in document order (empty for unweighted courses)
    pub records: Vec<AssignmentRecord>,
    /// Grade the portal itself shows, when present
    pub portal_reported_grade: Option<String>,
}

impl GradesPage {
    /// Whether the page carries a group weight table
    #[must_use]
    pub const fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }
}

/// Parse a grades page from its HTML source
///
/// Landmarks are read in a fixed order: breadcrumbs, weight table, summary
/// table. A page with no weight table stops after the course name, so it is
/// reported as unweighted even when the summary table is missing too.
///
/// # Errors
///
/// Returns [`GradeError::FatalParse`] when the breadcrumbs or, for a weighted
/// course, the grade summary table are missing.
pub fn parse_grades_page(html: &str) -> Result<GradesPage, GradeError> {
    let document = Html::parse_document(html);

    let course_name = read_course_name(&document)?;
    debug!("Parsing grades page for '{course_name}'");

    let Some(weights) = read_weights(&document) else {
        debug!("'{course_name}' has no weight table");
        return Ok(GradesPage {
            course_name,
            weights: None,
            records: Vec::new(),
            portal_reported_grade: None,
        });
    };

    let summary_body = document
        .select(&GRADES_SUMMARY)
        .next()
        .and_then(|table| table.select(&TBODY).next())
        .ok_or(GradeError::missing(Landmark::GradeSummary))?;

    let (records, portal_reported_grade) = read_summary_rows(summary_body);
    debug!(
        "'{course_name}': {} weighted groups, {} assignment records",
        weights.len(),
        records.len()
    );

    Ok(GradesPage {
        course_name,
        weights: Some(weights),
        records,
        portal_reported_grade,
    })
}

/// Read and parse a saved grades page from disk
///
/// # Errors
/// Returns an error if the file cannot be read or the page cannot be parsed
pub fn parse_grades_file<P: AsRef<Path>>(path: P) -> Result<GradesPage, Box<dyn Error>> {
    let html = fs::read_to_string(path)?;
    Ok(parse_grades_page(&html)?)
}

fn read_course_name(document: &Html) -> Result<String, GradeError> {
    document
        .select(&BREADCRUMBS)
        .next()
        .and_then(|crumbs| crumbs.select(&SPAN).nth(2))
        .map(rows::element_text)
        .ok_or(GradeError::missing(Landmark::Breadcrumbs))
}

/// Build the weight table from the "assignments not weighted" summary block
///
/// Each body row pairs a group-name header cell with a `NN%` cell.
fn read_weights(document: &Html) -> Option<CategoryWeights> {
    let body = document
        .select(&WEIGHTS_BLOCK)
        .next()?
        .select(&TBODY)
        .next()?;

    let mut weights = CategoryWeights::new();
    for row in body.select(&ROW) {
        let (Some(group), Some(weight)) = (
            row.select(&HEADER_CELL).next().map(rows::element_text),
            row.select(&DATA_CELL).next().map(rows::element_text),
        ) else {
            continue;
        };

        if group.eq_ignore_ascii_case(WEIGHT_TOTAL_LABEL) {
            continue;
        }

        let percent = weight.trim().trim_end_matches('%');
        match rows::parse_number(percent) {
            Some(value) => weights.insert(group, value),
            None => warn!("Ignoring weight '{weight}' for group '{group}': not a number"),
        }
    }

    Some(weights)
}

/// Walk the summary rows in document order
///
/// Each submission row opens a slot that the next grade-info row fills with
/// its mean. A grade-info row with no open slot is ignored and a slot that is
/// never filled keeps mean 0.
fn read_summary_rows(body: ElementRef<'_>) -> (Vec<AssignmentRecord>, Option<String>) {
    let mut records: Vec<AssignmentRecord> = Vec::new();
    let mut portal_grade = None;
    let mut awaiting_mean: Option<usize> = None;

    let summary_rows = body
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "tr");

    for row in summary_rows {
        let row_id = row.value().attr("id");
        match rows::classify(row_id) {
            RowKind::FinalGrade => {
                if let Some(grade) = rows::read_portal_grade(row) {
                    portal_grade = Some(grade);
                }
            }
            RowKind::ExcludedSummary => {
                debug!("Skipping summary row {}", row_id.unwrap_or_default());
            }
            RowKind::Submission { assignment_id } => {
                if let Some(record) = rows::read_submission(row, assignment_id) {
                    records.push(record);
                    awaiting_mean = Some(records.len() - 1);
                } else {
                    debug!("Skipping malformed submission row {assignment_id}");
                    awaiting_mean = None;
                }
            }
            RowKind::MeanInfo => match awaiting_mean.take() {
                Some(idx) => records[idx].mean = rows::read_mean(row),
                None => debug!(
                    "Grade info row {} has no submission to pair with",
                    row_id.unwrap_or_default()
                ),
            },
            RowKind::Unknown => {}
        }
    }

    (records, portal_grade)
}
