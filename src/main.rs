use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

mod chart;
mod error;
mod loader;
mod logging;
mod models;
mod occupancy;
mod report;
mod workload;

use chart::{AxisRange, ChartConfig};
use loader::{LoadOptions, SourceEncoding};
use models::{Dataset, SubjectCatalogEntry};

#[derive(Parser)]
#[command(name = "encargos-dashboard")]
#[command(about = "Teaching workload and seat occupancy reports for a department staffing export", long_about = None)]
struct Cli {
    /// Semicolon-delimited staffing export
    #[arg(long, env = "ENCARGOS_CSV", default_value = "cursosConsolidados_20251.csv", global = true)]
    data: PathBuf,
    #[arg(long, value_enum, default_value_t = SourceEncoding::Windows1252, global = true)]
    encoding: SourceEncoding,
    /// Course code holding graduate offerings
    #[arg(long, default_value = loader::DEFAULT_GRADUATE_COURSE, global = true)]
    graduate_course: String,
    #[arg(long, default_value_t = 20.0, value_parser = parse_axis_max, global = true)]
    workload_y_max: f64,
    #[arg(long, default_value_t = 200.0, value_parser = parse_axis_max, global = true)]
    occupancy_y_max: f64,
    #[arg(long, env = "ENCARGOS_LOG", default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print instructor, course and term totals
    Overview,
    /// List the values available for a selector
    List {
        #[arg(value_enum)]
        dimension: Dimension,
        #[arg(long)]
        course: Option<String>,
    },
    /// Workload history for one instructor against the department index
    Workload {
        #[arg(long)]
        instructor: String,
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// Seats offered and filled for one subject of a course
    Occupancy {
        #[arg(long)]
        course: String,
        /// Subject code or "code: title" label
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// Write a summary table as JSON
    Export {
        #[arg(value_enum)]
        table: SummaryTable,
        #[arg(long)]
        out: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        instructor: Option<String>,
        #[arg(long)]
        course: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Dimension {
    Instructors,
    Courses,
    Terms,
    Subjects,
}

#[derive(Clone, Copy, ValueEnum)]
enum SummaryTable {
    Workload,
    Occupancy,
}

fn parse_axis_max(value: &str) -> Result<f64, String> {
    let max: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !max.is_finite() || max <= 0.0 {
        return Err(format!("axis maximum must be a finite number above zero, got {value}"));
    }
    Ok(max)
}

fn load(cli: &Cli) -> anyhow::Result<Dataset> {
    let options = LoadOptions {
        encoding: cli.encoding,
        graduate_course: cli.graduate_course.clone(),
        ..LoadOptions::default()
    };
    load_source(&cli.data, &options)
}

fn load_source(path: &Path, options: &LoadOptions) -> anyhow::Result<Dataset> {
    match loader::load_dataset(path, options) {
        Ok(dataset) => Ok(dataset),
        Err(err) if err.is_not_found() => bail!(
            "data file '{}' not found; pass --data or set ENCARGOS_CSV",
            path.display()
        ),
        Err(err) => Err(err).context("failed to load staffing export"),
    }
}

fn ensure_instructor(dataset: &Dataset, instructor: &str) -> anyhow::Result<()> {
    if !dataset.has_instructor(instructor) {
        bail!("unknown instructor '{instructor}'; see `list instructors`");
    }
    Ok(())
}

fn ensure_course(dataset: &Dataset, course: &str) -> anyhow::Result<()> {
    if !dataset.has_course(course) {
        bail!("unknown course '{course}'; see `list courses`");
    }
    Ok(())
}

/// `Ok(None)` means the course exists but has no subjects to chart.
fn resolve_subject<'a>(
    dataset: &'a Dataset,
    course: &str,
    subject: Option<&str>,
) -> anyhow::Result<Option<&'a SubjectCatalogEntry>> {
    ensure_course(dataset, course)?;
    let subjects = dataset.subjects_for_course(course);
    let Some(first) = subjects.first().copied() else {
        return Ok(None);
    };

    match subject {
        Some(wanted) => subjects
            .into_iter()
            .find(|entry| entry.label == wanted || entry.code == wanted)
            .map(Some)
            .with_context(|| {
                format!("subject '{wanted}' is not offered by {course}; see `list subjects --course`")
            }),
        None => Ok(Some(first)),
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote json output");
    Ok(())
}

fn write_report(path: &Path, report: &str) -> anyhow::Result<()> {
    std::fs::write(path, report).with_context(|| format!("failed to write {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(env!("CARGO_CRATE_NAME"), &cli.log_level);

    let config = ChartConfig {
        workload_y: AxisRange::new(0.0, cli.workload_y_max),
        occupancy_y: AxisRange::new(0.0, cli.occupancy_y_max),
    };
    let dataset = load(&cli)?;

    match &cli.command {
        Commands::Overview => {
            let overview = dataset.overview();
            println!("Instructors: {}", overview.instructors);
            println!("Courses: {}", overview.courses);
            println!("Terms analysed: {}", overview.terms);
            if let (Some(first), Some(last)) = (overview.first_term, overview.last_term) {
                println!("Period: {first} to {last}");
            }
        }
        Commands::List { dimension, course } => match dimension {
            Dimension::Instructors => dataset.instructors.iter().for_each(|name| println!("{name}")),
            Dimension::Courses => dataset.courses.iter().for_each(|name| println!("{name}")),
            Dimension::Terms => dataset.terms.iter().for_each(|term| println!("{term}")),
            Dimension::Subjects => match course {
                Some(course) => {
                    let subjects = dataset.subjects_for_course(course);
                    if subjects.is_empty() {
                        println!("No subjects found for course {course}.");
                    }
                    for subject in subjects {
                        println!("{}", subject.label);
                    }
                }
                None => {
                    for subject in &dataset.subjects {
                        println!("{}\t{}", subject.course, subject.label);
                    }
                }
            },
        },
        Commands::Workload {
            instructor,
            chart_out,
        } => {
            ensure_instructor(&dataset, instructor)?;
            let summaries =
                workload::summarize_workload(&dataset.records, &dataset.terms, &dataset.graduate_course);
            let spec = chart::build_workload_chart(&dataset, &summaries, instructor, &config);

            print!("{}", spec.render_table());
            if let Some(path) = chart_out {
                write_json(path, &spec)?;
            }
        }
        Commands::Occupancy {
            course,
            subject,
            chart_out,
        } => {
            let Some(selected) = resolve_subject(&dataset, course, subject.as_deref())? else {
                warn!(course = %course, "course has no subjects");
                println!("No subjects found for course {course}.");
                return Ok(());
            };

            let rows = occupancy::summarize_occupancy(
                &dataset.records,
                &dataset.terms,
                &dataset.graduate_course,
            );
            let Some(spec) = chart::build_occupancy_chart(&rows, course, &selected.label, &config)
            else {
                println!("No occupancy data for {}.", selected.label);
                return Ok(());
            };

            print!("{}", spec.render_table());
            if let Some(metrics) =
                occupancy::occupancy_metrics(&occupancy::select(&rows, course, &selected.label))
            {
                println!();
                println!("Mean seats offered: {:.1}", metrics.mean_offered);
                println!("Mean seats filled: {:.1}", metrics.mean_filled);
                println!("Occupancy rate: {:.1}%", metrics.rate);
                println!("Terms analysed: {}", metrics.terms);
            }
            if let Some(path) = chart_out {
                write_json(path, &spec)?;
            }
        }
        Commands::Export { table, out } => match table {
            SummaryTable::Workload => write_json(
                out,
                &workload::summarize_workload(
                    &dataset.records,
                    &dataset.terms,
                    &dataset.graduate_course,
                ),
            )?,
            SummaryTable::Occupancy => write_json(
                out,
                &occupancy::summarize_occupancy(
                    &dataset.records,
                    &dataset.terms,
                    &dataset.graduate_course,
                ),
            )?,
        },
        Commands::Report {
            instructor,
            course,
            out,
        } => {
            if let Some(name) = instructor.as_deref() {
                ensure_instructor(&dataset, name)?;
            }
            if let Some(name) = course.as_deref() {
                ensure_course(&dataset, name)?;
            }

            let summaries =
                workload::summarize_workload(&dataset.records, &dataset.terms, &dataset.graduate_course);
            let rows = occupancy::summarize_occupancy(
                &dataset.records,
                &dataset.terms,
                &dataset.graduate_course,
            );
            let report = report::build_report(
                chrono::Utc::now().date_naive(),
                &dataset,
                &summaries,
                &rows,
                instructor.as_deref(),
                course.as_deref(),
                &config,
            );
            write_report(out, &report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
