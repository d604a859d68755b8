//! Library for `CourseMean`
//! Turns saved course grades pages into weighted class averages and student grades.

pub mod core;
pub mod logger;
pub mod shared;

pub use shared::*;
