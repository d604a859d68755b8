//! Shared module for functionality used by both the library and the CLI

pub mod config;

/// Returns the current version of the `CourseMean` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
