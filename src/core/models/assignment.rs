//! Assignment record model

use serde::{Deserialize, Serialize};

/// One assignment row scraped from a grades page
///
/// Numeric fields are already normalized: anything the page showed that was
/// not a finite number (an ungraded mean, an excused score, a `-`) is `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Assignment group the record counts toward (e.g., "Homework")
    pub category: String,

    /// Assignment title as shown in the row header (may be empty)
    pub name: String,

    /// Identifier suffix of the submission row (e.g., "48213" for `submission_48213`)
    pub assignment_id: String,

    /// Maximum points possible
    pub total: f64,

    /// Class mean score
    pub mean: f64,

    /// The logged-in student's score
    pub student_score: f64,

    /// Excluded from grade computation (dropped, excused, ...)
    pub dropped: bool,
}

impl AssignmentRecord {
    /// Create a record with a zero mean, to be filled in by its grade-info row
    ///
    /// # Arguments
    /// * `category` - Assignment group name
    /// * `total` - Points possible
    /// * `student_score` - Student's score
    /// * `dropped` - Whether the record is excluded from sums
    #[must_use]
    pub const fn new(category: String, total: f64, student_score: f64, dropped: bool) -> Self {
        Self {
            category,
            name: String::new(),
            assignment_id: String::new(),
            total,
            mean: 0.0,
            student_score,
            dropped,
        }
    }

    /// Set the class mean
    #[must_use]
    pub const fn with_mean(mut self, mean: f64) -> Self {
        self.mean = mean;
        self
    }

    /// Set the assignment title and row identifier
    #[must_use]
    pub fn with_identity(mut self, name: String, assignment_id: String) -> Self {
        self.name = name;
        self.assignment_id = assignment_id;
        self
    }

    /// Whether the record counts toward its category's sums
    #[must_use]
    pub const fn counts(&self) -> bool {
        !self.dropped
    }
}
