use std::collections::{BTreeSet, HashMap};

use crate::models::{Affiliation, InstructorTermLoad, StaffingRecord, TermWorkloadSummary};

/// Converts semester hours into the weekly load used by the department index.
pub const LOAD_DIVISOR: f64 = 15.0;

fn group_by_term(records: &[StaffingRecord]) -> HashMap<&str, Vec<&StaffingRecord>> {
    let mut groups: HashMap<&str, Vec<&StaffingRecord>> = HashMap::new();
    for record in records {
        groups.entry(record.term.as_str()).or_default().push(record);
    }
    groups
}

pub fn summarize_workload(
    records: &[StaffingRecord],
    terms: &[String],
    graduate_course: &str,
) -> Vec<TermWorkloadSummary> {
    let groups = group_by_term(records);

    terms
        .iter()
        .map(|term| {
            let rows = groups.get(term.as_str()).map(Vec::as_slice).unwrap_or_default();
            summarize_term(term, rows, graduate_course)
        })
        .collect()
}

fn summarize_term(
    term: &str,
    rows: &[&StaffingRecord],
    graduate_course: &str,
) -> TermWorkloadSummary {
    let mut by_affiliation: HashMap<Affiliation, BTreeSet<&str>> = HashMap::new();
    let mut everyone = BTreeSet::new();
    let mut total_hours = 0.0;
    let mut graduate_hours = 0.0;

    for row in rows {
        by_affiliation
            .entry(row.affiliation)
            .or_default()
            .insert(row.instructor.as_str());
        everyone.insert(row.instructor.as_str());
        total_hours += row.instructor_hours;
        if row.course == graduate_course {
            graduate_hours += row.instructor_hours;
        }
    }

    let count = |affiliation: Affiliation| by_affiliation.get(&affiliation).map_or(0, BTreeSet::len);
    let permanent = count(Affiliation::Permanent);
    let substitute = count(Affiliation::Substitute);

    let staff = permanent + substitute;
    let department_index = if staff > 0 {
        total_hours / LOAD_DIVISOR / staff as f64
    } else {
        0.0
    };

    let (undergraduate_share, graduate_share) = if total_hours > 0.0 {
        (
            (total_hours - graduate_hours) / total_hours,
            graduate_hours / total_hours,
        )
    } else {
        (0.0, 0.0)
    };

    TermWorkloadSummary {
        term: term.to_string(),
        instructors: everyone.len(),
        permanent,
        substitute,
        volunteer: count(Affiliation::Volunteer),
        visiting: count(Affiliation::Visiting),
        total_hours,
        graduate_hours,
        department_index,
        undergraduate_share,
        graduate_share,
    }
}

pub fn instructor_load(
    records: &[StaffingRecord],
    terms: &[String],
    instructor: &str,
    graduate_course: &str,
) -> Vec<InstructorTermLoad> {
    let mut totals: HashMap<&str, (f64, f64)> = HashMap::new();
    for record in records.iter().filter(|r| r.instructor == instructor) {
        let entry = totals.entry(record.term.as_str()).or_insert((0.0, 0.0));
        entry.0 += record.instructor_hours;
        if record.course == graduate_course {
            entry.1 += record.instructor_hours;
        }
    }

    terms
        .iter()
        .map(|term| {
            let (total, graduate) = totals.get(term.as_str()).copied().unwrap_or((0.0, 0.0));
            InstructorTermLoad {
                term: term.clone(),
                total: total / LOAD_DIVISOR,
                graduate: graduate / LOAD_DIVISOR,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn index_divides_hours_by_permanent_and_substitute_staff() {
        let records = vec![
            record("2024/1", "A", Affiliation::Permanent, "X", "X1", 4.0, 30, 25),
            record("2024/1", "B", Affiliation::Substitute, "X", "X1", 2.0, 30, 25),
        ];

        let summary = summarize_workload(&records, &terms(&["2024/1"]), "PROPEES");
        assert_eq!(summary.len(), 1);
        let row = &summary[0];
        assert_eq!(row.permanent, 1);
        assert_eq!(row.substitute, 1);
        assert!((row.department_index - 0.2).abs() < 1e-9);
    }

    #[test]
    fn index_is_zero_without_permanent_or_substitute_staff() {
        let records = vec![
            record("2024/1", "A", Affiliation::Volunteer, "X", "X1", 4.0, 30, 25),
            record("2024/1", "B", Affiliation::Visiting, "X", "X2", 6.0, 30, 25),
        ];

        let summary = summarize_workload(&records, &terms(&["2024/1"]), "PROPEES");
        assert_eq!(summary[0].department_index, 0.0);
        assert_eq!(summary[0].volunteer, 1);
        assert_eq!(summary[0].visiting, 1);
        assert_eq!(summary[0].instructors, 2);
    }

    #[test]
    fn instructors_are_counted_once_per_term() {
        let records = vec![
            record("2024/1", "A", Affiliation::Permanent, "X", "X1", 4.0, 30, 25),
            record("2024/1", "A", Affiliation::Permanent, "X", "X2", 4.0, 30, 25),
            record("2024/1", "A", Affiliation::Permanent, "PROPEES", "P1", 2.0, 10, 5),
        ];

        let summary = summarize_workload(&records, &terms(&["2024/1"]), "PROPEES");
        assert_eq!(summary[0].permanent, 1);
        assert!((summary[0].department_index - 10.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn shares_sum_to_one() {
        let records = vec![
            record("2024/1", "A", Affiliation::Permanent, "X", "X1", 6.0, 30, 25),
            record("2024/1", "B", Affiliation::Permanent, "PROPEES", "P1", 2.0, 10, 5),
        ];

        let summary = summarize_workload(&records, &terms(&["2024/1"]), "PROPEES");
        let row = &summary[0];
        assert!((row.undergraduate_share - 0.75).abs() < 1e-9);
        assert!((row.graduate_share - 0.25).abs() < 1e-9);
        assert!((row.undergraduate_share + row.graduate_share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn shares_are_zero_without_hours() {
        let records = vec![record("2024/1", "A", Affiliation::Permanent, "X", "X1", 0.0, 30, 25)];

        let summary = summarize_workload(&records, &terms(&["2024/1", "2024/2"]), "PROPEES");
        assert_eq!(summary.len(), 2);
        for row in &summary {
            assert_eq!(row.undergraduate_share, 0.0);
            assert_eq!(row.graduate_share, 0.0);
        }
        assert_eq!(summary[1].instructors, 0);
    }

    #[test]
    fn rows_follow_supplied_term_order() {
        let records = vec![
            record("2023/2", "A", Affiliation::Permanent, "X", "X1", 3.0, 30, 25),
            record("2024/1", "A", Affiliation::Permanent, "X", "X1", 3.0, 30, 25),
        ];

        let summary = summarize_workload(&records, &terms(&["2024/1", "2023/2"]), "PROPEES");
        let order: Vec<&str> = summary.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(order, vec!["2024/1", "2023/2"]);
    }

    #[test]
    fn instructor_load_splits_graduate_hours() {
        let records = vec![
            record("2024/1", "A", Affiliation::Permanent, "X", "X1", 30.0, 30, 25),
            record("2024/1", "A", Affiliation::Permanent, "PROPEES", "P1", 15.0, 10, 5),
            record("2024/1", "B", Affiliation::Permanent, "X", "X2", 60.0, 30, 25),
        ];

        let load = instructor_load(&records, &terms(&["2023/2", "2024/1"]), "A", "PROPEES");
        assert_eq!(load[0].total, 0.0);
        assert!((load[1].total - 3.0).abs() < 1e-9);
        assert!((load[1].graduate - 1.0).abs() < 1e-9);
    }
}
