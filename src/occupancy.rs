use std::collections::{BTreeMap, HashMap};

use crate::models::{OccupancyMetrics, StaffingRecord, SubjectOccupancySummary};

pub fn summarize_occupancy(
    records: &[StaffingRecord],
    terms: &[String],
    graduate_course: &str,
) -> Vec<SubjectOccupancySummary> {
    // (term) -> (course, code) -> (label, offered, filled)
    let mut groups: HashMap<&str, BTreeMap<(&str, &str), (String, u64, u64)>> = HashMap::new();

    for record in records.iter().filter(|r| r.course != graduate_course) {
        let entry = groups
            .entry(record.term.as_str())
            .or_default()
            .entry((record.course.as_str(), record.code.as_str()))
            .or_insert_with(|| (record.label(), 0, 0));
        entry.1 += u64::from(record.offered);
        entry.2 += u64::from(record.filled);
    }

    let mut summaries = Vec::new();
    for term in terms {
        let Some(subjects) = groups.get(term.as_str()) else {
            continue;
        };
        for ((course, code), (label, offered, filled)) in subjects {
            summaries.push(SubjectOccupancySummary {
                term: term.clone(),
                course: course.to_string(),
                code: code.to_string(),
                label: label.clone(),
                offered: *offered,
                filled: *filled,
            });
        }
    }

    summaries
}

pub fn select<'a>(
    summaries: &'a [SubjectOccupancySummary],
    course: &str,
    label: &str,
) -> Vec<&'a SubjectOccupancySummary> {
    summaries
        .iter()
        .filter(|row| row.course == course && row.label == label)
        .collect()
}

pub fn occupancy_metrics(rows: &[&SubjectOccupancySummary]) -> Option<OccupancyMetrics> {
    if rows.is_empty() {
        return None;
    }

    let count = rows.len() as f64;
    let mean_offered = rows.iter().map(|row| row.offered as f64).sum::<f64>() / count;
    let mean_filled = rows.iter().map(|row| row.filled as f64).sum::<f64>() / count;
    let rate = if mean_offered > 0.0 {
        mean_filled / mean_offered * 100.0
    } else {
        0.0
    };

    Some(OccupancyMetrics {
        mean_offered,
        mean_filled,
        rate,
        terms: rows.len(),
    })
}
