use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("staffing export not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid {encoding} text", path.display())]
    Encoding { path: PathBuf, encoding: &'static str },

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("invalid row at line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error("{} contains no staffing records", .0.display())]
    Empty(PathBuf),
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::SourceNotFound(_))
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
