//! Report rendering over the sample grades pages.

use course_mean::core::export::render_course_csv;
use course_mean::core::models::CourseOutcome;
use course_mean::core::pipeline::compute_file;
use course_mean::core::report::{
    HtmlReporter, MarkdownReporter, ReportContext, ReportFormat, ReportGenerator,
};
use std::path::PathBuf;

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples/grades")
        .join(name)
}

fn outcomes() -> Vec<CourseOutcome> {
    vec![
        compute_file(sample("weighted_course.html")).expect("weighted"),
        compute_file(sample("unweighted_course.html")).expect("unweighted"),
    ]
}

#[test]
fn markdown_report_lists_every_course() {
    let outcomes = outcomes();
    let ctx = ReportContext::new(&outcomes, 2);
    let report = MarkdownReporter::new().render(&ctx).expect("render");

    assert!(report.starts_with("# Course Grades Report"));
    assert!(report.contains("1 of 2 courses use weighted assignment groups"));
    assert!(report.contains("## CS 354: Machine Organization and Programming"));
    assert!(report.contains("| Course Average | 74.33 |"));
    assert!(report.contains("| Student Grade | 89.00 |"));
    assert!(report.contains("| Grade on Canvas | 89% |"));
    assert!(report.contains("| Homework | 50.00 | 23.00 | 27.00 | 30.00 | 2 | 1 | 38.33 | 45.00 |"));
    assert!(report.contains("## ART HIST 201: Global Visual Culture"));
    assert!(report.contains("_Class has no weights._"));
}

#[test]
fn html_report_escapes_and_flags() {
    let outcomes = outcomes();
    let ctx = ReportContext::new(&outcomes, 1).with_title("Fall <2026>");
    let report = HtmlReporter::new().render(&ctx).expect("render");

    assert!(report.starts_with("<!DOCTYPE html>"));
    assert!(report.contains("Fall &lt;2026&gt;"));
    assert!(report.contains("<td>Exams</td>"));
    assert!(report.contains("74.3"));
    assert!(report.contains("Class has no weights."));
}

#[test]
fn generate_writes_file_for_each_format() {
    let outcomes = outcomes();
    let ctx = ReportContext::new(&outcomes, 2);
    let dir = tempfile::tempdir().expect("tempdir");

    for format in [ReportFormat::Markdown, ReportFormat::Html] {
        let path = dir.path().join(format!("grades.{}", format.extension()));
        format
            .generator()
            .generate(&ctx, &path)
            .expect("generate");
        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains("CS 354"));
    }
}

#[test]
fn generate_creates_missing_output_directories() {
    let outcomes = outcomes();
    let ctx = ReportContext::new(&outcomes, 2);
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fall").join("week7").join("grades.html");

    ReportFormat::Html
        .generator()
        .generate(&ctx, &path)
        .expect("generate");

    assert!(path.is_file());
}

#[test]
fn csv_export_of_sample_course() {
    let outcome = compute_file(sample("weighted_course.html")).expect("weighted");
    let csv = render_course_csv(outcome.result().expect("graded"), 2);

    assert!(csv.starts_with("Course,CS 354: Machine Organization and Programming\n"));
    assert!(csv.contains("Grade on Canvas,89%"));
    assert!(csv.contains("\nExams,72.00,88.00,100.00,0,50.00,36.00,44.00,false\n"));
}
