//! End-to-end tests: saved grades pages through extraction and aggregation.

use course_mean::core::error::{GradeError, Landmark};
use course_mean::core::models::CourseOutcome;
use course_mean::core::parser::parse_grades_file;
use course_mean::core::pipeline::{self, compute, compute_file};
use std::path::PathBuf;

const TOLERANCE: f64 = 1e-6;

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples/grades")
        .join(name)
}

#[test]
fn weighted_course_matches_hand_computed_totals() {
    let outcome = compute_file(sample("weighted_course.html")).expect("outcome");
    let result = outcome.result().expect("weighted course");

    assert_eq!(
        result.course_name,
        "CS 354: Machine Organization and Programming"
    );
    assert_eq!(result.portal_reported_grade.as_deref(), Some("89%"));

    let homework = result
        .per_category
        .iter()
        .find(|row| row.category == "Homework")
        .expect("homework row");
    assert!((homework.summed_total - 30.0).abs() < TOLERANCE);
    assert!((homework.summed_mean - 23.0).abs() < TOLERANCE);
    assert!((homework.summed_student_score - 27.0).abs() < TOLERANCE);
    assert_eq!(homework.graded_count, 2);
    assert_eq!(homework.dropped_count, 1);
    assert!((homework.weighted_course_pct - 23.0 / 30.0 * 50.0).abs() < TOLERANCE);
    assert!((homework.weighted_student_pct - 45.0).abs() < TOLERANCE);

    assert!((result.course_average - (23.0 / 30.0 * 50.0 + 36.0)).abs() < TOLERANCE);
    assert!((result.student_grade - 89.0).abs() < TOLERANCE);
    assert_eq!(result.flagged_categories().count(), 0);
}

#[test]
fn weighted_course_records_follow_document_order() {
    let page = parse_grades_file(sample("weighted_course.html")).expect("page");

    let ids: Vec<&str> = page
        .records
        .iter()
        .map(|record| record.assignment_id.as_str())
        .collect();
    assert_eq!(ids, vec!["1520441", "1520442", "1520443", "1520450"]);

    // Score read from the cell text when the points element is absent
    assert!((page.records[1].student_score - 18.0).abs() < TOLERANCE);
    assert!((page.records[1].mean - 15.0).abs() < TOLERANCE);
    assert!(page.records[2].dropped);
    assert_eq!(page.records[3].name, "Midterm Exam 1");
}

#[test]
fn totals_equal_independent_sum_of_counted_records() {
    let page = parse_grades_file(sample("weighted_course.html")).expect("page");
    let weights = page.weights.clone().expect("weights");

    let mut expected_avg = 0.0;
    let mut expected_student = 0.0;
    for (category, weight) in weights.iter() {
        let counted: Vec<_> = page
            .records
            .iter()
            .filter(|r| r.category == category && !r.dropped)
            .collect();
        let total: f64 = counted.iter().map(|r| r.total).sum();
        if total > 0.0 {
            expected_avg += counted.iter().map(|r| r.mean).sum::<f64>() / total * weight;
            expected_student += counted.iter().map(|r| r.student_score).sum::<f64>() / total * weight;
        }
    }

    let result = pipeline::compute_page(page).expect("outcome");
    let result = result.result().expect("weighted");
    assert!((result.course_average - expected_avg).abs() < TOLERANCE);
    assert!((result.student_grade - expected_student).abs() < TOLERANCE);
}

#[test]
fn unweighted_course_is_informational() {
    let outcome = compute_file(sample("unweighted_course.html")).expect("outcome");

    assert_eq!(
        outcome,
        CourseOutcome::Unweighted {
            course_name: "ART HIST 201: Global Visual Culture".to_string()
        }
    );
    assert!(outcome.summary(2).ends_with("Class has no weights\n"));
}

#[test]
fn unknown_group_is_rejected() {
    let html = std::fs::read_to_string(sample("unknown_group.html")).expect("read sample");
    let err = compute(&html).unwrap_err();

    assert_eq!(
        err,
        GradeError::DataIntegrity {
            category: "Quizzes".to_string()
        }
    );
}

#[test]
fn login_page_is_not_a_grades_page() {
    let html = std::fs::read_to_string(sample("login_page.html")).expect("read sample");
    assert_eq!(
        compute(&html).unwrap_err(),
        GradeError::missing(Landmark::Breadcrumbs)
    );
}

#[test]
fn same_page_gives_same_result_twice() {
    let html = std::fs::read_to_string(sample("weighted_course.html")).expect("read sample");
    assert_eq!(compute(&html).expect("first"), compute(&html).expect("second"));
}

#[test]
fn ungraded_assignment_scores_zero_but_counts_points() {
    let html = r#"<html><body>
        <nav id="breadcrumbs"><ul>
          <li><span class="ellipsible"><span>Home</span></span></li>
          <li><span class="ellipsible">CHEM 103</span></li>
        </ul></nav>
        <div id="assignments-not-weighted"><table><tbody>
          <tr><th>Labs</th><td>40%</td></tr>
        </tbody></table></div>
        <table id="grades_summary"><tbody>
          <tr id="submission_1"><th class="title"><div class="context">Labs</div></th>
            <td></td><td><span class="original_points">10</span></td><td>10</td><td class="details"></td></tr>
          <tr id="grade_info_1"><td><table><tbody><tr><td>Mean: 9</td></tr></tbody></table></td></tr>
          <tr id="submission_2"><th class="title"><div class="context">Labs</div></th>
            <td></td><td><span class="original_points">-</span></td><td>10</td><td class="details"></td></tr>
        </tbody></table>
    </body></html>"#;

    let outcome = compute(html).expect("outcome");
    let result = outcome.result().expect("weighted");
    let labs = &result.per_category[0];

    assert!((labs.summed_total - 20.0).abs() < TOLERANCE);
    assert!((labs.summed_student_score - 10.0).abs() < TOLERANCE);
    assert!((result.student_grade - 20.0).abs() < TOLERANCE);
    assert!((result.course_average - 18.0).abs() < TOLERANCE);
}

#[test]
fn dropped_rows_in_several_groups_are_counted_not_summed() {
    let html = r#"<html><body>
        <nav id="breadcrumbs"><ul>
          <li><span class="ellipsible"><span>Home</span></span></li>
          <li><span class="ellipsible">PHYS 202</span></li>
        </ul></nav>
        <div id="assignments-not-weighted"><table><tbody>
          <tr><th>Homework</th><td>50%</td></tr>
          <tr><th>Exams</th><td>50%</td></tr>
        </tbody></table></div>
        <table id="grades_summary"><tbody>
          <tr id="submission_1"><th class="title"><div class="context">Homework</div></th>
            <td></td><td><span class="original_points">9</span></td><td>10</td><td class="details"><a href="/a/1">i</a></td></tr>
          <tr id="grade_info_1"><td><table><tbody><tr><td>Mean: 8</td></tr></tbody></table></td></tr>
          <tr id="comments_thread_1" class="comments"><td><table><tbody><tr><td>ok</td></tr></tbody></table></td></tr>
          <tr id="submission_2" class="dropped"><th class="title"><div class="context">Homework</div></th>
            <td></td><td><span class="original_points">2</span></td><td>5</td><td class="details"><a href="/a/2">i</a></td></tr>
          <tr id="grade_info_2"><td><table><tbody><tr><td>Mean: 3</td></tr></tbody></table></td></tr>
          <tr id="comments_thread_2" class="comments"><td><table><tbody><tr><td>late</td></tr></tbody></table></td></tr>
          <tr id="submission_3"><th class="title"><div class="context">Homework</div></th>
            <td></td><td><span class="original_points">1</span></td><td>5</td><td class="details"><a href="/a/3" aria-expanded="false">i</a></td></tr>
          <tr id="grade_info_3"><td><table><tbody><tr><td>Mean: 4</td></tr></tbody></table></td></tr>
          <tr id="comments_thread_3" class="comments"><td><table><tbody><tr><td>-</td></tr></tbody></table></td></tr>
          <tr id="submission_4"><th class="title"><div class="context">Exams</div></th>
            <td></td><td><span class="original_points">80</span></td><td>100</td><td class="details"><a href="/a/4">i</a></td></tr>
          <tr id="grade_info_4"><td><table><tbody><tr><td>Mean: 70</td></tr></tbody></table></td></tr>
          <tr id="comments_thread_4" class="comments"><td><table><tbody><tr><td>-</td></tr></tbody></table></td></tr>
          <tr id="submission_5" class="excused"><th class="title"><div class="context">Exams</div></th>
            <td></td><td><span class="original_points">-</span></td><td>50</td><td class="details"><a href="/a/5">i</a></td></tr>
          <tr id="grade_info_5"><td><table><tbody><tr><td>Mean: 30</td></tr></tbody></table></td></tr>
          <tr id="comments_thread_5" class="comments"><td><table><tbody><tr><td>-</td></tr></tbody></table></td></tr>
        </tbody></table>
    </body></html>"#;

    let outcome = compute(html).expect("outcome");
    let result = outcome.result().expect("weighted");
    let group = |name: &str| {
        result
            .per_category
            .iter()
            .find(|row| row.category == name)
            .expect("group row")
    };

    let homework = group("Homework");
    assert!((homework.summed_mean - 8.0).abs() < TOLERANCE);
    assert!((homework.summed_student_score - 9.0).abs() < TOLERANCE);
    assert!((homework.summed_total - 10.0).abs() < TOLERANCE);
    assert_eq!(homework.graded_count, 1);
    assert_eq!(homework.dropped_count, 2);

    let exams = group("Exams");
    assert!((exams.summed_mean - 70.0).abs() < TOLERANCE);
    assert!((exams.summed_student_score - 80.0).abs() < TOLERANCE);
    assert!((exams.summed_total - 100.0).abs() < TOLERANCE);
    assert_eq!(exams.graded_count, 1);
    assert_eq!(exams.dropped_count, 1);

    assert_eq!(result.dropped_count(), 3);
    assert!((result.course_average - 75.0).abs() < TOLERANCE);
    assert!((result.student_grade - 85.0).abs() < TOLERANCE);
}

#[test]
fn batch_keeps_going_after_a_bad_page() {
    let paths = vec![
        sample("login_page.html"),
        sample("weighted_course.html"),
        sample("unknown_group.html"),
        sample("unweighted_course.html"),
    ];
    let mut progress = Vec::new();
    let entries = pipeline::compute_files(&paths, |pct| progress.push(pct));

    assert_eq!(entries.len(), 4);
    assert!(entries[0].outcome.is_err());
    assert!(entries[1].outcome.is_ok());
    assert!(entries[2]
        .outcome
        .as_ref()
        .unwrap_err()
        .contains("Quizzes"));
    assert!(matches!(
        entries[3].outcome,
        Ok(CourseOutcome::Unweighted { .. })
    ));
    assert!((progress[3] - 100.0).abs() < 1e-9);
}
