//! Data models for `CourseMean`

pub mod assignment;
pub mod outcome;
pub mod weights;

pub use assignment::AssignmentRecord;
pub use outcome::{CategorySummary, CourseOutcome, CourseResult};
pub use weights::CategoryWeights;
