use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse orders: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported locale: {0}")]
    UnknownLocale(String),

    #[error("invalid message catalog for {locale}: {source}")]
    Messages {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A field value that does not match the expected format.
///
/// The loader degrades the field to missing instead of failing the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("'{value}' is not a date in format {format}")]
    Date { value: String, format: String },

    #[error("'{value}' is not a number")]
    Number { value: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
