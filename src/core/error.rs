//! Errors raised while reading a grades page or aggregating its records

use std::error::Error;
use std::fmt;

/// A page element the extractor cannot do without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landmark {
    /// `#breadcrumbs` navigation, or fewer than three crumbs in it
    Breadcrumbs,
    /// `#grades_summary` table body
    GradeSummary,
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Breadcrumbs => write!(f, "breadcrumb navigation"),
            Self::GradeSummary => write!(f, "grade summary table"),
        }
    }
}

/// Failure of the scrape/aggregate pipeline
///
/// An unweighted course is not an error; see
/// [`CourseOutcome::Unweighted`](crate::core::models::CourseOutcome::Unweighted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeError {
    /// The document is not a recognizable grades page
    FatalParse {
        /// Which landmark was missing
        landmark: Landmark,
    },
    /// An assignment's group has no entry in the page's weight table
    DataIntegrity {
        /// The group with no weight
        category: String,
    },
}

impl GradeError {
    /// Convenience constructor for a missing landmark
    #[must_use]
    pub const fn missing(landmark: Landmark) -> Self {
        Self::FatalParse { landmark }
    }
}

impl fmt::Display for GradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FatalParse { landmark } => {
                write!(f, "not a grades page: missing {landmark}")
            }
            Self::DataIntegrity { category } => write!(
                f,
                "assignment group '{category}' has no entry in the weight table"
            ),
        }
    }
}

impl Error for GradeError {}
