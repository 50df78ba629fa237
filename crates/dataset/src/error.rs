use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a data file.
///
/// Record-level problems never surface here; they are dropped and counted
/// in [`crate::Diagnostics`]. Only a file that cannot be read or parsed as
/// a whole is an error.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl DatasetError {
    /// Path of the file involved.
    pub fn path(&self) -> &std::path::Path {
        match self {
            DatasetError::Read { path, .. } | DatasetError::Parse { path, .. } => path,
        }
    }
}
