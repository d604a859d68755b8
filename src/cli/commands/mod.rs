//! CLI command handlers for `coursemean`.
//!
//! Each subcommand is implemented in its own submodule.

pub mod compute;
pub mod config;
pub mod report;

use std::path::{Path, PathBuf};

/// Make sure a configured output directory exists
pub fn ensure_dir(dir: &Path, what: &str) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("✗ Failed to create {what} directory {}: {e}", dir.display()))?;
    Ok(dir.to_path_buf())
}

/// File stem of an input page, used to name generated files
pub fn input_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("course")
        .to_string()
}
