//! Grades page scraping and weighted grade computation

pub mod error;
pub mod export;
pub mod grading;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod report;

pub use error::{GradeError, Landmark};
pub use models::{CourseOutcome, CourseResult};
