//! Aggregation results

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One row of a course's working table: the sums for a single assignment group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Assignment group name
    pub category: String,
    /// Sum of class means over counted assignments
    pub summed_mean: f64,
    /// Sum of the student's scores over counted assignments
    pub summed_student_score: f64,
    /// Sum of points possible over counted assignments
    pub summed_total: f64,
    /// Number of counted (non-dropped) assignments
    pub graded_count: usize,
    /// Number of dropped assignments in this group
    pub dropped_count: usize,
    /// Group weight as a percentage
    pub weight: f64,
    /// `summed_mean / summed_total * weight`
    pub weighted_course_pct: f64,
    /// `summed_student_score / summed_total * weight`
    pub weighted_student_pct: f64,
    /// Nothing to divide by: the group contributes 0 to both totals
    pub zero_total: bool,
}

/// Weighted averages for one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    /// Course name from the page breadcrumbs
    pub course_name: String,
    /// Per-group rows, ordered by group name
    pub per_category: Vec<CategorySummary>,
    /// Sum of every group's `weighted_course_pct`
    pub course_average: f64,
    /// Sum of every group's `weighted_student_pct`
    pub student_grade: f64,
    /// Grade the portal itself displays, verbatim
    pub portal_reported_grade: Option<String>,
}

impl CourseResult {
    /// Groups that hit the zero-total policy
    pub fn flagged_categories(&self) -> impl Iterator<Item = &str> {
        self.per_category
            .iter()
            .filter(|row| row.zero_total)
            .map(|row| row.category.as_str())
    }

    /// Total number of dropped assignments across all groups
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.per_category.iter().map(|row| row.dropped_count).sum()
    }
}

/// What one grades page produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CourseOutcome {
    /// The course uses weighted groups and was aggregated
    Graded(CourseResult),
    /// The course has no group weighting; nothing was computed
    Unweighted {
        /// Course name from the page breadcrumbs
        course_name: String,
    },
}

impl CourseOutcome {
    /// Course name for either outcome
    #[must_use]
    pub fn course_name(&self) -> &str {
        match self {
            Self::Graded(result) => &result.course_name,
            Self::Unweighted { course_name } => course_name,
        }
    }

    /// The aggregated result, if the course is weighted
    #[must_use]
    pub const fn result(&self) -> Option<&CourseResult> {
        match self {
            Self::Graded(result) => Some(result),
            Self::Unweighted { .. } => None,
        }
    }

    /// Human-readable summary handed to the presentation layer
    ///
    /// ```text
    /// Intro to Databases
    /// Your Grade on Canvas: 91.5%
    /// Course Average: 83.33
    /// Student Grade: 90.00
    /// ```
    #[must_use]
    pub fn summary(&self, precision: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.course_name());

        match self {
            Self::Unweighted { .. } => {
                out.push_str("Class has no weights\n");
            }
            Self::Graded(result) => {
                if let Some(grade) = &result.portal_reported_grade {
                    let _ = writeln!(out, "Your Grade on Canvas: {grade}");
                }
                let _ = writeln!(
                    out,
                    "Course Average: {:.precision$}",
                    result.course_average
                );
                let _ = writeln!(out, "Student Grade: {:.precision$}", result.student_grade);

                let flagged: Vec<&str> = result.flagged_categories().collect();
                if !flagged.is_empty() {
                    let _ = writeln!(out, "No graded work yet in: {}", flagged.join(", "));
                }
            }
        }

        out
    }
}
