use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with the export file as a whole.
///
/// Per-row problems are never errors: they are counted as skips.
#[derive(Debug, Error)]
pub enum TakeoutError {
    #[error("no {file_name} found under {}", root.display())]
    NotFound { root: PathBuf, file_name: String },

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export is missing a {0} column")]
    MissingColumn(&'static str),
}
