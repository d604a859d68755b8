//! Row classification and per-row field readers for the grade summary table
//!
//! Every `<tr>` of the summary table carries an `id` whose prefix says what
//! the row is. [`classify`] maps that id to a [`RowKind`]; the `read_*`
//! helpers pull the fields out of the rows that matter.

use crate::core::models::AssignmentRecord;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

/// Prefix of the row holding the portal's own final grade
const FINAL_GRADE_PREFIX: &str = "submission_final-grade";

/// Rows that repeat totals already covered elsewhere
const EXCLUDED_PREFIXES: [&str; 4] = [
    "submission_group",
    FINAL_GRADE_PREFIX,
    "grade_info_final",
    "grade_info_group",
];

const SUBMISSION_PREFIX: &str = "submission";
const MEAN_INFO_PREFIX: &str = "grade_info";

/// Classes that mark a submission as excluded from the grade
const DROPPED_CLASSES: [&str; 2] = ["dropped", "excused"];

/// The score cell's layout puts the student score this many tokens from the end
const SCORE_TOKEN_FROM_END: usize = 5;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

static DIV: LazyLock<Selector> = LazyLock::new(|| selector("div"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static GRADE_SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span.grade"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("th.title a"));
static ORIGINAL_POINTS: LazyLock<Selector> = LazyLock::new(|| selector(".original_points"));
static DETAILS_LINK: LazyLock<Selector> = LazyLock::new(|| selector("td.details a"));
static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static TBODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// What a summary-table row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<'a> {
    /// The portal's final grade row
    FinalGrade,
    /// A group or final-grade summary row; carries nothing new
    ExcludedSummary,
    /// One assignment submission
    Submission {
        /// Id suffix after `submission_`
        assignment_id: &'a str,
    },
    /// Score statistics (mean) for the submission just before it
    MeanInfo,
    /// No id, or an id with no known prefix (comment threads, rubric rows, ...)
    Unknown,
}

/// Classify a row by its `id` attribute
///
/// Order matters: the final-grade row also matches the submission prefix and
/// the excluded list, so it is tested first.
#[must_use]
pub fn classify(row_id: Option<&str>) -> RowKind<'_> {
    let Some(id) = row_id else {
        return RowKind::Unknown;
    };

    if id.starts_with(FINAL_GRADE_PREFIX) {
        RowKind::FinalGrade
    } else if EXCLUDED_PREFIXES.iter().any(|prefix| id.starts_with(prefix)) {
        RowKind::ExcludedSummary
    } else if id.starts_with(SUBMISSION_PREFIX) {
        let assignment_id = id
            .strip_prefix(SUBMISSION_PREFIX)
            .map_or("", |rest| rest.trim_start_matches('_'));
        RowKind::Submission { assignment_id }
    } else if id.starts_with(MEAN_INFO_PREFIX) {
        RowKind::MeanInfo
    } else {
        RowKind::Unknown
    }
}

/// Parse a cell's text as a finite number
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a cell's text, falling back to 0 for `-`, `EX`, empty cells and the like
#[must_use]
pub fn number_or_zero(text: &str) -> f64 {
    parse_number(text).unwrap_or(0.0)
}

/// Text content of an element with runs of whitespace collapsed
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn direct_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "td")
        .collect()
}

/// Read the grade the portal displays on its final-grade row
#[must_use]
pub fn read_portal_grade(row: ElementRef<'_>) -> Option<String> {
    row.select(&GRADE_SPAN)
        .next()
        .or_else(|| row.select(&SPAN).nth(2))
        .map(element_text)
        .filter(|grade| !grade.is_empty())
}

/// Read the student score out of the score cell
fn read_student_score(score_cell: ElementRef<'_>) -> f64 {
    if let Some(points) = score_cell.select(&ORIGINAL_POINTS).next() {
        return number_or_zero(&element_text(points));
    }

    let tokens: Vec<&str> = score_cell.text().flat_map(str::split_whitespace).collect();
    tokens
        .len()
        .checked_sub(SCORE_TOKEN_FROM_END)
        .map_or(0.0, |idx| number_or_zero(tokens[idx]))
}

/// Whether the row is excluded from the grade
///
/// Either the row carries a `dropped`/`excused` class, or its details link
/// exposes an `aria-expanded` toggle, which the portal only renders for
/// dropped work.
fn is_dropped(row: ElementRef<'_>) -> bool {
    let marked = row
        .value()
        .classes()
        .any(|class| DROPPED_CLASSES.contains(&class));
    let expandable = row
        .select(&DETAILS_LINK)
        .next()
        .is_some_and(|link| link.value().attr("aria-expanded").is_some());
    marked || expandable
}

/// Build a record from a submission row
///
/// The points-possible cell is the second to last `<td>` and the score cell
/// the third to last. Returns `None` when the row has too few cells to hold
/// both. The mean is left at 0 for the following grade-info row to fill in.
#[must_use]
pub fn read_submission(row: ElementRef<'_>, assignment_id: &str) -> Option<AssignmentRecord> {
    let cells = direct_cells(row);
    let total_cell = *cells.get(cells.len().checked_sub(2)?)?;
    let score_cell = *cells.get(cells.len().checked_sub(3)?)?;

    let category = row.select(&DIV).next().map(element_text).unwrap_or_default();
    let name = row
        .select(&TITLE_LINK)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let record = AssignmentRecord::new(
        category,
        number_or_zero(&element_text(total_cell)),
        read_student_score(score_cell),
        is_dropped(row),
    )
    .with_identity(name, assignment_id.to_string());

    Some(record)
}

/// Read the class mean from a grade-info row
///
/// The first cell of the nested statistics table reads like `Mean: 8.5`.
/// Ungraded assignments have no statistics table, giving 0.
#[must_use]
pub fn read_mean(row: ElementRef<'_>) -> f64 {
    // Selectors match ancestors outside the row, so walk down one level at a time
    row.select(&TABLE)
        .next()
        .and_then(|stats| stats.select(&TBODY).next())
        .and_then(|body| body.select(&CELL).next())
        .map_or(0.0, |cell| {
            let text = element_text(cell);
            text.rsplit(':').next().map_or(0.0, number_or_zero)
        })
}
