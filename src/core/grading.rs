//! Weighted course averages

use crate::core::error::GradeError;
use crate::core::models::{AssignmentRecord, CategorySummary, CategoryWeights, CourseResult};
use crate::{debug, warn};
use std::collections::BTreeMap;

/// Weight sums further than this from 100 are logged
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Running sums for one assignment group
#[derive(Debug, Default)]
struct GroupSums {
    mean: f64,
    student_score: f64,
    total: f64,
    graded: usize,
    dropped: usize,
}

/// Per-group rows and the two grand totals
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// One row per group that has at least one record, ordered by group name
    pub per_category: Vec<CategorySummary>,
    /// Weighted class average, in percent
    pub course_average: f64,
    /// Weighted student grade, in percent
    pub student_grade: f64,
}

impl Aggregation {
    /// Sum of the weights of the groups that have at least one record
    #[must_use]
    pub fn weight_total(&self) -> f64 {
        self.per_category.iter().map(|row| row.weight).sum()
    }

    /// Attach the page-level fields to produce the course result
    #[must_use]
    pub fn into_result(
        self,
        course_name: String,
        portal_reported_grade: Option<String>,
    ) -> CourseResult {
        CourseResult {
            course_name,
            per_category: self.per_category,
            course_average: self.course_average,
            student_grade: self.student_grade,
            portal_reported_grade,
        }
    }
}

/// Aggregate assignment records into weighted group percentages.
///
/// Dropped records are counted per group but never summed. For each group,
/// `weighted_course_pct = summed_mean / summed_total * weight` and
/// `weighted_student_pct = summed_student_score / summed_total * weight`; the
/// grand totals are the sums of those across groups.
///
/// A group with nothing to divide by (no points possible among its counted
/// records) contributes 0 to both totals and is flagged with `zero_total`.
///
/// # Errors
///
/// Returns [`GradeError::DataIntegrity`] if any record, dropped or not,
/// belongs to a group missing from `weights`.
pub fn aggregate(
    records: &[AssignmentRecord],
    weights: &CategoryWeights,
) -> Result<Aggregation, GradeError> {
    let groups = sum_groups(records, weights)?;

    let mut per_category = Vec::with_capacity(groups.len());
    for (category, sums) in groups {
        // Membership was checked while summing
        let weight = weights.get(category).unwrap_or_default();
        per_category.push(weigh_group(category, &sums, weight));
    }

    let course_average = per_category.iter().map(|row| row.weighted_course_pct).sum();
    let student_grade = per_category.iter().map(|row| row.weighted_student_pct).sum();

    debug!(
        "Aggregated {} records into {} groups: average {course_average:.4}, student {student_grade:.4}",
        records.len(),
        per_category.len()
    );

    let aggregation = Aggregation {
        per_category,
        course_average,
        student_grade,
    };
    let weight_total = aggregation.weight_total();
    if (weight_total - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
        debug!("Weights of the graded groups sum to {weight_total:.2}%, not 100%");
    }

    Ok(aggregation)
}

fn sum_groups<'r>(
    records: &'r [AssignmentRecord],
    weights: &CategoryWeights,
) -> Result<BTreeMap<&'r str, GroupSums>, GradeError> {
    let mut groups: BTreeMap<&str, GroupSums> = BTreeMap::new();

    for record in records {
        if !weights.contains(&record.category) {
            return Err(GradeError::DataIntegrity {
                category: record.category.clone(),
            });
        }

        let sums = groups.entry(record.category.as_str()).or_default();
        if record.counts() {
            sums.mean += record.mean;
            sums.student_score += record.student_score;
            sums.total += record.total;
            sums.graded += 1;
        } else {
            sums.dropped += 1;
        }
    }

    Ok(groups)
}

fn weigh_group(category: &str, sums: &GroupSums, weight: f64) -> CategorySummary {
    let zero_total = sums.total.abs() < f64::EPSILON;
    let (weighted_course_pct, weighted_student_pct) = if zero_total {
        warn!("Group '{category}' has no points possible yet; counting it as 0");
        (0.0, 0.0)
    } else {
        (
            sums.mean / sums.total * weight,
            sums.student_score / sums.total * weight,
        )
    };

    CategorySummary {
        category: category.to_string(),
        summed_mean: sums.mean,
        summed_student_score: sums.student_score,
        summed_total: sums.total,
        graded_count: sums.graded,
        dropped_count: sums.dropped,
        weight,
        weighted_course_pct,
        weighted_student_pct,
        zero_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn record(category: &str, total: f64, mean: f64, student: f64, dropped: bool) -> AssignmentRecord {
        AssignmentRecord::new(category.to_string(), total, student, dropped).with_mean(mean)
    }

    fn weights(entries: &[(&str, f64)]) -> CategoryWeights {
        entries.iter().map(|(name, weight)| (*name, *weight)).collect()
    }

    #[test]
    fn sums_non_dropped_records_per_group() {
        let records = vec![
            record("Homework", 10.0, 8.0, 9.0, false),
            record("Homework", 20.0, 15.0, 18.0, false),
            record("Homework", 5.0, 4.0, 1.0, true),
        ];
        let agg = aggregate(&records, &weights(&[("Homework", 50.0)])).expect("aggregate");

        assert_eq!(agg.per_category.len(), 1);
        let row = &agg.per_category[0];
        assert!((row.summed_total - 30.0).abs() < TOLERANCE);
        assert!((row.summed_mean - 23.0).abs() < TOLERANCE);
        assert!((row.summed_student_score - 27.0).abs() < TOLERANCE);
        assert_eq!(row.graded_count, 2);
        assert_eq!(row.dropped_count, 1);
        assert!((row.weighted_course_pct - 23.0 / 30.0 * 50.0).abs() < TOLERANCE);
        assert!((row.weighted_student_pct - 45.0).abs() < TOLERANCE);
        assert!(!row.zero_total);
    }

    #[test]
    fn weight_total_covers_only_groups_with_records() {
        let records = vec![
            record("Homework", 10.0, 8.0, 9.0, false),
            record("Exams", 100.0, 70.0, 80.0, true),
        ];
        let agg = aggregate(
            &records,
            &weights(&[("Homework", 30.0), ("Exams", 50.0), ("Project", 20.0)]),
        )
        .expect("aggregate");

        assert!((agg.weight_total() - 80.0).abs() < TOLERANCE);
    }

    #[test]
    fn grand_totals_sum_weighted_groups() {
        let records = vec![
            record("Homework", 10.0, 8.0, 10.0, false),
            record("Exams", 100.0, 70.0, 85.0, false),
            record("Quizzes", 4.0, 3.0, 2.0, false),
        ];
        let w = weights(&[("Homework", 30.0), ("Exams", 50.0), ("Quizzes", 20.0)]);
        let agg = aggregate(&records, &w).expect("aggregate");

        let expected_avg = 0.8 * 30.0 + 0.7 * 50.0 + 0.75 * 20.0;
        let expected_student = 1.0 * 30.0 + 0.85 * 50.0 + 0.5 * 20.0;
        assert!((agg.course_average - expected_avg).abs() < TOLERANCE);
        assert!((agg.student_grade - expected_student).abs() < TOLERANCE);

        let order: Vec<&str> = agg.per_category.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(order, vec!["Exams", "Homework", "Quizzes"]);
    }

    #[test]
    fn unknown_group_is_a_data_integrity_error() {
        let records = vec![record("Quizzes", 10.0, 5.0, 5.0, false)];
        let err = aggregate(&records, &weights(&[("Homework", 100.0)])).unwrap_err();

        assert_eq!(
            err,
            GradeError::DataIntegrity {
                category: "Quizzes".to_string()
            }
        );
    }

    #[test]
    fn weighted_group_without_records_is_absent() {
        let records = vec![record("Homework", 10.0, 5.0, 5.0, false)];
        let agg = aggregate(&records, &weights(&[("Homework", 40.0), ("Exams", 60.0)]))
            .expect("aggregate");

        assert_eq!(agg.per_category.len(), 1);
        assert_eq!(agg.per_category[0].category, "Homework");
    }

    #[test]
    fn all_dropped_group_contributes_zero_and_is_flagged() {
        let records = vec![
            record("Homework", 10.0, 8.0, 9.0, false),
            record("Exams", 50.0, 40.0, 45.0, true),
        ];
        let agg = aggregate(&records, &weights(&[("Homework", 50.0), ("Exams", 50.0)]))
            .expect("aggregate");

        let exams = agg
            .per_category
            .iter()
            .find(|r| r.category == "Exams")
            .expect("exams row");
        assert!(exams.zero_total);
        assert_eq!(exams.dropped_count, 1);
        assert!(exams.weighted_course_pct.abs() < TOLERANCE);
        assert!((agg.course_average - 40.0).abs() < TOLERANCE);
        assert!(agg.course_average.is_finite());
        assert!(agg.student_grade.is_finite());
    }

    #[test]
    fn empty_records_give_zero_totals() {
        let agg = aggregate(&[], &weights(&[("Homework", 100.0)])).expect("aggregate");
        assert!(agg.per_category.is_empty());
        assert!(agg.course_average.abs() < TOLERANCE);
        assert!(agg.student_grade.abs() < TOLERANCE);
    }

    #[test]
    fn into_result_keeps_page_fields() {
        let records = vec![record("Homework", 10.0, 8.0, 9.0, false)];
        let result = aggregate(&records, &weights(&[("Homework", 100.0)]))
            .expect("aggregate")
            .into_result("BIO 101".to_string(), Some("A".to_string()));

        assert_eq!(result.course_name, "BIO 101");
        assert_eq!(result.portal_reported_grade.as_deref(), Some("A"));
        assert!((result.student_grade - 90.0).abs() < TOLERANCE);
    }
}
