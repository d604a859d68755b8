//! HTML extraction for saved grades pages

pub mod grades_page;
pub mod rows;

pub use grades_page::{parse_grades_file, parse_grades_page, GradesPage};
pub use rows::RowKind;
