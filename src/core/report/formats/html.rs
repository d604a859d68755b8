//! HTML report generator
//!
//! Produces a single self-contained page with embedded CSS. Course and group
//! names are HTML-escaped by the template engine.

use crate::core::report::{write_report, CourseView, ReportContext, ReportGenerator};
use crate::get_version;
use askama::Template;
use std::error::Error;
use std::path::Path;

#[derive(Template)]
#[template(path = "report.html")]
struct HtmlReport<'a> {
    title: &'a str,
    version: &'a str,
    graded_count: usize,
    courses: &'a [CourseView],
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        write_report(output_path, &report_content)
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let courses = ctx.course_views();
        let report = HtmlReport {
            title: &ctx.title,
            version: get_version(),
            graded_count: ctx.graded_count(),
            courses: &courses,
        };
        Ok(report.render()?)
    }
}
