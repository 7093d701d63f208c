use std::fmt::Write;

use chrono::NaiveDate;

use crate::chart::{self, ChartConfig};
use crate::models::{Dataset, SubjectOccupancySummary, TermWorkloadSummary};
use crate::occupancy;

pub fn build_report(
    generated_on: NaiveDate,
    dataset: &Dataset,
    workload: &[TermWorkloadSummary],
    occupancy_rows: &[SubjectOccupancySummary],
    instructor: Option<&str>,
    course: Option<&str>,
    config: &ChartConfig,
) -> String {
    let overview = dataset.overview();
    let mut output = String::new();

    let _ = writeln!(output, "# Encargos Dashboard Report");
    let _ = writeln!(output, "Generated on {generated_on}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Instructors: {}", overview.instructors);
    let _ = writeln!(output, "- Courses: {}", overview.courses);
    let _ = writeln!(output, "- Terms analysed: {}", overview.terms);
    if let (Some(first), Some(last)) = (&overview.first_term, &overview.last_term) {
        let _ = writeln!(output, "- Period: {first} to {last}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Department Workload (CHSM)");
    if workload.is_empty() {
        let _ = writeln!(output, "No terms recorded.");
    } else {
        let _ = writeln!(
            output,
            "| Term | PRF | SUB | VOL | VIS | Index | Undergraduate | Graduate |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for row in workload {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {:.2} | {:.1}% | {:.1}% |",
                row.term,
                row.permanent,
                row.substitute,
                row.volunteer,
                row.visiting,
                row.department_index,
                row.undergraduate_share * 100.0,
                row.graduate_share * 100.0
            );
        }
    }

    if let Some(name) = instructor {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Instructor: {name}");
        let spec = chart::build_workload_chart(dataset, workload, name, config);
        let _ = writeln!(output, "| Term | CH DEES | CH TOTAL | CH {} |", dataset.graduate_course);
        let _ = writeln!(output, "|---|---|---|---|");
        for (idx, term) in spec.categories.iter().enumerate() {
            let value = |series: usize| spec.series[series].values[idx];
            let _ = writeln!(
                output,
                "| {} | {:.2} | {:.2} | {:.2} |",
                term,
                value(0),
                value(1),
                value(2)
            );
        }
    }

    if let Some(course) = course {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Course Occupancy: {course}");
        let subjects = dataset.subjects_for_course(course);
        if subjects.is_empty() {
            let _ = writeln!(output, "No subjects found for this course.");
        }
        for subject in subjects {
            let rows = occupancy::select(occupancy_rows, course, &subject.label);
            match occupancy::occupancy_metrics(&rows) {
                Some(metrics) => {
                    let _ = writeln!(
                        output,
                        "- {}: mean seats {:.1}, mean filled {:.1}, occupancy {:.1}% over {} terms",
                        subject.label,
                        metrics.mean_offered,
                        metrics.mean_filled,
                        metrics.rate,
                        metrics.terms
                    );
                }
                None => {
                    let _ = writeln!(output, "- {}: no data", subject.label);
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{dataset, record};
    use crate::models::Affiliation;
    use crate::occupancy::summarize_occupancy;
    use crate::workload::summarize_workload;

    fn render(instructor: Option<&str>, course: Option<&str>) -> String {
        let data = dataset(vec![
            record("2023/2", "A", Affiliation::Permanent, "X", "X1", 30.0, 40, 30),
            record("2024/1", "B", Affiliation::Substitute, "X", "X1", 30.0, 40, 20),
            record("2024/1", "A", Affiliation::Permanent, "PROPEES", "P1", 15.0, 10, 8),
        ]);
        let workload = summarize_workload(&data.records, &data.terms, &data.graduate_course);
        let occupancy_rows = summarize_occupancy(&data.records, &data.terms, &data.graduate_course);
        let generated_on = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        build_report(
            generated_on,
            &data,
            &workload,
            &occupancy_rows,
            instructor,
            course,
            &ChartConfig::default(),
        )
    }

    #[test]
    fn report_contains_overview_and_workload() {
        let report = render(None, None);
        assert!(report.contains("Generated on 2025-03-01"));
        assert!(report.contains("- Instructors: 2"));
        assert!(report.contains("- Period: 2023/2 to 2024/1"));
        assert!(report.contains("| 2023/2 | 1 | 0 | 0 | 0 | 2.00 | 100.0% | 0.0% |"));
        assert!(!report.contains("## Instructor"));
    }

    #[test]
    fn report_includes_selected_instructor_and_course() {
        let report = render(Some("A"), Some("X"));
        assert!(report.contains("## Instructor: A"));
        assert!(report.contains("| 2024/1 |"));
        assert!(report.contains("- X1: Disciplina X1: mean seats 40.0, mean filled 25.0, occupancy 62.5% over 2 terms"));
    }

    #[test]
    fn report_flags_course_without_subjects() {
        let report = render(None, Some("PROPEES"));
        assert!(report.contains("No subjects found for this course."));
    }

    #[test]
    fn report_is_deterministic() {
        assert_eq!(render(Some("B"), Some("X")), render(Some("B"), Some("X")));
    }
}
