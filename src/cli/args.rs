//! CLI argument definitions for `coursemean`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use course_mean::config::ConfigOverrides;
use course_mean::core::report::ReportFormat;
use course_mean::logger::Level;

/// CLI log level argument
///
/// Stored lowercase in the config file and converted to [`Level`] at runtime.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key (e.g., `level`, `reports_dir`, `precision`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Restore one configuration value to its default.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Compute class averages and your grade from saved grades pages.
    ///
    /// Each page is processed on its own; a page that cannot be read or
    /// parsed is reported and the rest still run.
    Compute {
        /// Saved course grades pages (HTML)
        #[arg(value_name = "FILES", num_args = 1..)]
        input_files: Vec<PathBuf>,

        /// Export each weighted course's table to CSV
        #[arg(long)]
        csv: bool,

        /// CSV output paths (optional; defaults to config `exports_dir`)
        ///
        /// When provided, must match the number of input files 1:1.
        #[arg(short, long, value_name = "FILES", num_args = 1.., requires = "csv")]
        output: Vec<PathBuf>,
    },
    /// Render one report covering every given course.
    Report {
        /// Saved course grades pages (HTML)
        #[arg(value_name = "FILES", num_args = 1..)]
        input_files: Vec<PathBuf>,

        /// Output file path (optional; defaults to `reports_dir/<first input>_report.<ext>`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: ReportFormat,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "coursemean",
    about = "Weighted class averages and student grades from saved course grades pages",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Override config CSV exports directory
    #[arg(long = "config-exports-dir", value_name = "DIR")]
    pub config_exports_dir: Option<PathBuf>,

    /// Override config CSV exports directory (short form)
    #[arg(long = "exports-dir", value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Override config display precision (decimal places)
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--reports-dir`) take precedence over
    /// long-form flags (e.g., `--config-reports-dir`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            reports_dir: path_string(self.reports_dir.as_ref())
                .or_else(|| path_string(self.config_reports_dir.as_ref())),
            exports_dir: path_string(self.exports_dir.as_ref())
                .or_else(|| path_string(self.config_exports_dir.as_ref())),
            precision: self.precision,
        }
    }
}
