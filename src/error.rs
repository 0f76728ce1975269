use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the catalog.
///
/// All of them are fatal at startup; nothing past the loader returns one.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV missing required '{0}' column")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
