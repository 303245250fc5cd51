use thiserror::Error;

/// A view descriptor that cannot be applied to the record schema.
///
/// Raised before any record is touched, so a failed call never leaves a
/// partially computed view behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unsupported operator '{operator}' for field {field}")]
    UnsupportedOperator { operator: String, field: String },

    #[error("unsupported aggregate '{aggregate}' for field {field}")]
    UnsupportedAggregate { aggregate: String, field: String },

    #[error("invalid descriptor '{text}': {message}")]
    InvalidDescriptor { text: String, message: String },

    #[error("invalid value '{value}' for field {field}")]
    InvalidValue { value: String, field: String },
}

impl ConfigurationError {
    pub(crate) fn invalid(text: &str, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            text: text.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
