use std::fmt::Write;

use serde::Serialize;

use crate::models::{Dataset, SubjectOccupancySummary, TermWorkloadSummary};
use crate::workload;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Y-axis ranges applied to the two line charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub workload_y: AxisRange,
    pub occupancy_y: AxisRange,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            workload_y: AxisRange::new(0.0, 20.0),
            occupancy_y: AxisRange::new(0.0, 200.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: String,
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: Option<String>,
    pub legend_title: String,
    pub x_axis: String,
    pub y_range: AxisRange,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn render_table(&self) -> String {
        let mut output = String::new();
        if let Some(title) = &self.title {
            let _ = writeln!(output, "{title}");
        }

        let _ = write!(output, "{:<10}", self.x_axis);
        for series in &self.series {
            let _ = write!(output, " {:>12}", series.name);
        }
        let _ = writeln!(output);

        for (idx, category) in self.categories.iter().enumerate() {
            let _ = write!(output, "{category:<10}");
            for series in &self.series {
                let value = series.values.get(idx).copied().unwrap_or_default();
                let _ = write!(output, " {value:>12.2}");
            }
            let _ = writeln!(output);
        }

        output
    }
}

pub fn build_workload_chart(
    dataset: &Dataset,
    summaries: &[TermWorkloadSummary],
    instructor: &str,
    config: &ChartConfig,
) -> ChartSpec {
    let categories: Vec<String> = summaries.iter().map(|row| row.term.clone()).collect();
    let load = workload::instructor_load(
        &dataset.records,
        &categories,
        instructor,
        &dataset.graduate_course,
    );

    ChartSpec {
        title: Some(instructor.to_string()),
        legend_title: "CHSM".to_string(),
        x_axis: "semestre".to_string(),
        y_range: config.workload_y,
        series: vec![
            Series {
                key: "department".to_string(),
                name: "CH DEES".to_string(),
                values: summaries.iter().map(|row| row.department_index).collect(),
            },
            Series {
                key: "instructor_total".to_string(),
                name: "CH TOTAL".to_string(),
                values: load.iter().map(|row| row.total).collect(),
            },
            Series {
                key: "instructor_graduate".to_string(),
                name: format!("CH {}", dataset.graduate_course),
                values: load.iter().map(|row| row.graduate).collect(),
            },
        ],
        categories,
    }
}

/// Returns `None` when the course/subject pair has no rows to plot.
pub fn build_occupancy_chart(
    summaries: &[SubjectOccupancySummary],
    course: &str,
    label: &str,
    config: &ChartConfig,
) -> Option<ChartSpec> {
    let rows = crate::occupancy::select(summaries, course, label);
    if rows.is_empty() {
        return None;
    }

    Some(ChartSpec {
        title: Some(label.to_string()),
        legend_title: "Ocupação".to_string(),
        x_axis: "semestre".to_string(),
        y_range: config.occupancy_y,
        categories: rows.iter().map(|row| row.term.clone()).collect(),
        series: vec![
            Series {
                key: "offered".to_string(),
                name: "vagas".to_string(),
                values: rows.iter().map(|row| row.offered as f64).collect(),
            },
            Series {
                key: "filled".to_string(),
                name: "ocupação".to_string(),
                values: rows.iter().map(|row| row.filled as f64).collect(),
            },
        ],
    })
}
