//! Error types for patient-client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Input rejected by the resource builder before any request is made.
///
/// Variants are listed in the order the builder checks them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("First name is required")]
    FirstNameRequired,

    #[error("Last name is required")]
    LastNameRequired,

    #[error("Gender is required")]
    GenderRequired,

    #[error("Birth date is required")]
    BirthDateRequired,

    #[error("Invalid birth date format")]
    InvalidDate,

    #[error("Birth date cannot be in the future")]
    BirthDateInFuture,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid phone number format")]
    InvalidPhone,
}

/// Broad category of a failure, as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Local input problem; nothing was sent.
    Validation,
    /// Missing selection or blank identifier/search term; nothing was sent.
    Precondition,
    /// The request was sent and failed, or never reached the server.
    Transport,
}

/// Patient client errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Precondition(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Validation(_) => FailureKind::Validation,
            Error::Precondition(_) => FailureKind::Precondition,
            Error::Status { .. }
            | Error::Http(_)
            | Error::Json(_)
            | Error::MalformedResponse(_) => FailureKind::Transport,
        }
    }

    /// HTTP status of the failed response, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<ferrum_models::Error> for Error {
    fn from(err: ferrum_models::Error) -> Self {
        match err {
            ferrum_models::Error::SerializationError(e) => Error::Json(e),
            other => Error::MalformedResponse(other.to_string()),
        }
    }
}
