//! Markdown report generator
//!
//! Renders one section per course with a summary table and the per-group
//! working table. Reads well on GitHub, GitLab and VS Code.

use crate::core::report::{
    write_report, CategoryView, CourseView, ReportContext, ReportGenerator,
};
use crate::get_version;
use askama::Template;
use std::error::Error;
use std::path::Path;

#[derive(Template)]
#[template(path = "report.md", escape = "none")]
struct MarkdownReport<'a> {
    title: &'a str,
    version: &'a str,
    graded_count: usize,
    courses: &'a [CourseView],
}

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Escape characters that would break a table cell
    fn cell(text: &str) -> String {
        text.replace('|', "\\|")
    }

    fn escape_view(mut view: CourseView) -> CourseView {
        view.name = Self::cell(&view.name);
        view.portal_grade = Self::cell(&view.portal_grade);
        view.flagged = Self::cell(&view.flagged);
        view.rows = view
            .rows
            .into_iter()
            .map(|row| CategoryView {
                category: Self::cell(&row.category),
                ..row
            })
            .collect();
        view
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        write_report(output_path, &report_content)
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let courses: Vec<CourseView> = ctx
            .course_views()
            .into_iter()
            .map(Self::escape_view)
            .collect();

        let report = MarkdownReport {
            title: &ctx.title,
            version: get_version(),
            graded_count: ctx.graded_count(),
            courses: &courses,
        };
        Ok(report.render()?)
    }
}
