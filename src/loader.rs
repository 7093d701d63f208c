use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{LoadError, LoadResult};
use crate::models::{Affiliation, Dataset, StaffingRecord, SubjectCatalogEntry};

pub const DEFAULT_GRADUATE_COURSE: &str = "PROPEES";

pub const REQUIRED_COLUMNS: [&str; 11] = [
    "semestre", "professor", "codigo", "nome", "curso", "ch", "ch_prof", "turma", "vagas",
    "ocupacao", "vinculo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceEncoding {
    #[value(name = "cp1252")]
    Windows1252,
    #[value(name = "utf8")]
    Utf8,
}

impl SourceEncoding {
    fn codec(self) -> &'static encoding_rs::Encoding {
        match self {
            SourceEncoding::Windows1252 => encoding_rs::WINDOWS_1252,
            SourceEncoding::Utf8 => encoding_rs::UTF_8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: SourceEncoding,
    pub graduate_course: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: SourceEncoding::Windows1252,
            graduate_course: DEFAULT_GRADUATE_COURSE.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct CsvRow {
    semestre: String,
    professor: String,
    codigo: String,
    nome: String,
    curso: String,
    ch: f64,
    ch_prof: f64,
    turma: String,
    vagas: u32,
    ocupacao: u32,
    vinculo: Affiliation,
}

pub fn load_dataset(path: &Path, options: &LoadOptions) -> LoadResult<Dataset> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::SourceNotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let codec = options.encoding.codec();
    let text = codec
        .decode_without_bom_handling_and_without_replacement(&bytes)
        .ok_or_else(|| LoadError::Encoding {
            path: path.to_path_buf(),
            encoding: codec.name(),
        })?;

    let records = parse_records(text.trim_start_matches('\u{feff}'), options.delimiter)?;
    if records.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let dataset = build_dataset(records, &options.graduate_course);
    info!(
        path = %path.display(),
        records = dataset.records.len(),
        terms = dataset.terms.len(),
        "loaded staffing export"
    );
    debug!(
        instructors = dataset.instructors.len(),
        courses = dataset.courses.len(),
        subjects = dataset.subjects.len(),
        "derived dimensions"
    );

    Ok(dataset)
}

pub fn parse_records(text: &str, delimiter: u8) -> LoadResult<Vec<StaffingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|&&column| !headers.iter().any(|header| header == column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let raw = result?;
        let line = raw.position().map(|pos| pos.line()).unwrap_or_default();
        let row: CsvRow = raw.deserialize(Some(&headers))?;

        for (column, value) in [("ch", row.ch), ("ch_prof", row.ch_prof)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LoadError::InvalidRow {
                    line,
                    message: format!("{column} must be a non-negative number, got {value}"),
                });
            }
        }

        records.push(StaffingRecord {
            term: row.semestre,
            instructor: row.professor,
            code: row.codigo,
            title: row.nome,
            course: row.curso,
            total_hours: row.ch,
            instructor_hours: row.ch_prof,
            section: row.turma,
            offered: row.vagas,
            filled: row.ocupacao,
            affiliation: row.vinculo,
        });
    }

    Ok(records)
}

pub fn build_dataset(records: Vec<StaffingRecord>, graduate_course: &str) -> Dataset {
    let mut terms = BTreeSet::new();
    let mut instructors = BTreeSet::new();
    let mut courses = BTreeSet::new();
    let mut subjects = BTreeSet::new();

    for record in &records {
        terms.insert(record.term.clone());
        instructors.insert(record.instructor.clone());
        courses.insert(record.course.clone());
        if record.course != graduate_course {
            subjects.insert(SubjectCatalogEntry {
                label: record.label(),
                course: record.course.clone(),
                code: record.code.clone(),
                title: record.title.clone(),
            });
        }
    }

    Dataset {
        records,
        terms: terms.into_iter().collect(),
        instructors: instructors.into_iter().collect(),
        courses: courses.into_iter().collect(),
        subjects: subjects.into_iter().collect(),
        graduate_course: graduate_course.to_string(),
    }
}
