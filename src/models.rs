use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum Affiliation {
    #[serde(rename = "PRF")]
    Permanent,
    #[serde(rename = "SUB")]
    Substitute,
    #[serde(rename = "VOL")]
    Volunteer,
    #[serde(rename = "VIS")]
    Visiting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffingRecord {
    pub term: String,
    pub instructor: String,
    pub code: String,
    pub title: String,
    pub course: String,
    pub total_hours: f64,
    pub instructor_hours: f64,
    pub section: String,
    pub offered: u32,
    pub filled: u32,
    pub affiliation: Affiliation,
}

impl StaffingRecord {
    /// Display label used by the subject selector, e.g. `"ENG101: Estatica"`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.code, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubjectCatalogEntry {
    pub label: String,
    pub course: String,
    pub code: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermWorkloadSummary {
    pub term: String,
    pub instructors: usize,
    pub permanent: usize,
    pub substitute: usize,
    pub volunteer: usize,
    pub visiting: usize,
    pub total_hours: f64,
    pub graduate_hours: f64,
    pub department_index: f64,
    pub undergraduate_share: f64,
    pub graduate_share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructorTermLoad {
    pub term: String,
    pub total: f64,
    pub graduate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectOccupancySummary {
    pub term: String,
    pub course: String,
    pub code: String,
    pub label: String,
    pub offered: u64,
    pub filled: u64,
}

impl SubjectOccupancySummary {
    pub fn rate(&self) -> f64 {
        if self.offered == 0 {
            0.0
        } else {
            self.filled as f64 / self.offered as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyMetrics {
    pub mean_offered: f64,
    pub mean_filled: f64,
    pub rate: f64,
    pub terms: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    pub instructors: usize,
    pub courses: usize,
    pub terms: usize,
    pub first_term: Option<String>,
    pub last_term: Option<String>,
}

/// Immutable result of a load. Dimension lists are sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<StaffingRecord>,
    pub terms: Vec<String>,
    pub instructors: Vec<String>,
    pub courses: Vec<String>,
    pub subjects: Vec<SubjectCatalogEntry>,
    pub graduate_course: String,
}

impl Dataset {
    pub fn subjects_for_course(&self, course: &str) -> Vec<&SubjectCatalogEntry> {
        self.subjects
            .iter()
            .filter(|entry| entry.course == course)
            .collect()
    }

    pub fn has_instructor(&self, instructor: &str) -> bool {
        self.instructors.iter().any(|name| name == instructor)
    }

    pub fn has_course(&self, course: &str) -> bool {
        self.courses.iter().any(|name| name == course)
    }

    pub fn overview(&self) -> DatasetOverview {
        DatasetOverview {
            instructors: self.instructors.len(),
            courses: self.courses.len(),
            terms: self.terms.len(),
            first_term: self.terms.first().cloned(),
            last_term: self.terms.last().cloned(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{dataset, record};
    use super::*;

    #[test]
    fn label_joins_code_and_title() {
        let row = record("2024/1", "Ana", Affiliation::Permanent, "ENC", "ENG101", 4.0, 30, 20);
        assert_eq!(row.label(), "ENG101: Disciplina ENG101");
    }

    #[test]
    fn subjects_for_course_lists_each_catalog_entry_once() {
        let data = dataset(vec![
            record("2024/1", "Ana", Affiliation::Permanent, "ENC", "ENG101", 4.0, 30, 20),
            record("2024/2", "Bia", Affiliation::Substitute, "ENC", "ENG101", 4.0, 30, 20),
            record("2024/1", "Ana", Affiliation::Permanent, "ARQ", "ENG202", 4.0, 30, 20),
            record("2024/1", "Ana", Affiliation::Permanent, "PROPEES", "PEC900", 4.0, 10, 5),
        ]);

        let subjects = data.subjects_for_course("ENC");
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].code, "ENG101");
        assert!(data.subjects_for_course("PROPEES").is_empty());
    }

    #[test]
    fn overview_reports_term_range() {
        let data = dataset(vec![
            record("2013/1", "Ana", Affiliation::Permanent, "ENC", "ENG101", 4.0, 30, 20),
            record("2012/2", "Bia", Affiliation::Visiting, "ARQ", "ENG202", 4.0, 30, 20),
        ]);

        let overview = data.overview();
        assert_eq!(overview.instructors, 2);
        assert_eq!(overview.courses, 2);
        assert_eq!(overview.terms, 2);
        assert_eq!(overview.first_term.as_deref(), Some("2012/2"));
        assert_eq!(overview.last_term.as_deref(), Some("2013/1"));
    }

    #[test]
    fn occupancy_rate_is_zero_without_seats() {
        let row = SubjectOccupancySummary {
            term: "2024/1".to_string(),
            course: "ENC".to_string(),
            code: "ENG101".to_string(),
            label: "ENG101: Estatica".to_string(),
            offered: 0,
            filled: 3,
        };
        assert_eq!(row.rate(), 0.0);
    }
}
