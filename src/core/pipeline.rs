//! Document to outcome glue
//!
//! Runs the extractor and the aggregator on one grades page, or on a batch of
//! saved pages where each page succeeds or fails on its own.

use crate::core::error::GradeError;
use crate::core::grading;
use crate::core::models::CourseOutcome;
use crate::core::parser::{self, GradesPage};
use crate::{debug, info};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Compute the outcome for one grades page given as HTML source
///
/// # Errors
///
/// Returns [`GradeError::FatalParse`] if the page is not a grades page, or
/// [`GradeError::DataIntegrity`] if an assignment's group has no weight.
pub fn compute(html: &str) -> Result<CourseOutcome, GradeError> {
    let page = parser::parse_grades_page(html)?;
    compute_page(page)
}

/// Aggregate an already parsed page
///
/// # Errors
///
/// Returns [`GradeError::DataIntegrity`] if an assignment's group has no weight.
pub fn compute_page(page: GradesPage) -> Result<CourseOutcome, GradeError> {
    let GradesPage {
        course_name,
        weights,
        records,
        portal_reported_grade,
    } = page;

    let Some(weights) = weights else {
        info!("'{course_name}' has no group weights; skipping aggregation");
        return Ok(CourseOutcome::Unweighted { course_name });
    };

    let aggregation = grading::aggregate(&records, &weights)?;
    Ok(CourseOutcome::Graded(
        aggregation.into_result(course_name, portal_reported_grade),
    ))
}

/// Read a saved grades page from disk and compute its outcome
///
/// # Errors
/// Returns an error if the file cannot be read or the pipeline fails
pub fn compute_file<P: AsRef<Path>>(path: P) -> Result<CourseOutcome, Box<dyn Error>> {
    let path = path.as_ref();
    debug!("Computing grades for {}", path.display());
    let page = parser::parse_grades_file(path)?;
    Ok(compute_page(page)?)
}

/// Outcome of one document in a batch
#[derive(Debug)]
pub struct BatchEntry {
    /// The document that was processed
    pub path: PathBuf,
    /// The course outcome, or a message describing why the document failed
    pub outcome: Result<CourseOutcome, String>,
}

/// Compute outcomes for many saved pages
///
/// A failing document never stops the batch. `on_progress` is called after
/// each document with the completed percentage (0-100).
pub fn compute_files<F>(paths: &[PathBuf], mut on_progress: F) -> Vec<BatchEntry>
where
    F: FnMut(f64),
{
    let mut entries = Vec::with_capacity(paths.len());
    #[allow(clippy::cast_precision_loss)]
    let step = if paths.is_empty() {
        0.0
    } else {
        100.0 / paths.len() as f64
    };
    let mut progress = 0.0;

    for path in paths {
        let outcome = compute_file(path).map_err(|e| e.to_string());
        entries.push(BatchEntry {
            path: path.clone(),
            outcome,
        });

        progress += step;
        on_progress(progress.min(100.0));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <nav id="breadcrumbs"><ul>
          <li><span>Home</span></li><li><span>Courses</span></li><li><span>MATH 221</span></li>
        </ul></nav>
        <div id="assignments-not-weighted"><table><tbody>
          <tr><th>Homework</th><td>100%</td></tr>
        </tbody></table></div>
        <table id="grades_summary"><tbody>
          <tr id="submission_1">
            <th class="title"><a href="/a/1">HW 1</a><div class="context">Homework</div></th>
            <td></td><td><span class="original_points">8</span></td><td>10</td><td></td>
          </tr>
          <tr id="grade_info_1"><td><table><tbody><tr><td>Mean: 6</td></tr></tbody></table></td></tr>
        </tbody></table>
    </body></html>"#;

    #[test]
    fn computes_weighted_outcome() {
        let outcome = compute(PAGE).expect("outcome");
        let result = outcome.result().expect("graded");

        assert_eq!(result.course_name, "MATH 221");
        assert!((result.course_average - 60.0).abs() < 1e-6);
        assert!((result.student_grade - 80.0).abs() < 1e-6);
    }

    #[test]
    fn not_a_grades_page_fails() {
        assert!(matches!(
            compute("<html><body>Sign in</body></html>"),
            Err(GradeError::FatalParse { .. })
        ));
    }

    #[test]
    fn empty_batch_reports_nothing() {
        let mut calls = 0;
        let entries = compute_files(&[], |_| calls += 1);
        assert!(entries.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn batch_continues_past_missing_files() {
        let paths = vec![
            PathBuf::from("/nonexistent/one.html"),
            PathBuf::from("/nonexistent/two.html"),
        ];
        let mut seen = Vec::new();
        let entries = compute_files(&paths, |pct| seen.push(pct));

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|entry| entry.outcome.is_err()));
        assert_eq!(seen.len(), 2);
        assert!((seen[0] - 50.0).abs() < 1e-9);
        assert!((seen[1] - 100.0).abs() < 1e-9);
    }
}
