use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("The file was not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

impl LoadError {
    /// Path of the source that failed to load.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::NotFound(path) => path,
            LoadError::Io { path, .. } => path,
            LoadError::Csv { path, .. } => path,
            LoadError::MissingColumn { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
