use std::path::PathBuf;

use thiserror::Error;

use orders_model::ConfigurationError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write spreadsheet row: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
