//! Error types for FHIR models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Expected {expected} resource, got '{found}'")]
    UnexpectedResourceType { expected: String, found: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value '{value}' for {field}")]
    InvalidCode { field: &'static str, value: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn unexpected_type(expected: &str, found: &str) -> Self {
        Error::UnexpectedResourceType {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
