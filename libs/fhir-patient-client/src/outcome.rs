//! Operation outcomes and the presentation sink

use crate::error::{Error, FailureKind};
use ferrum_models::Patient;
use std::fmt;

/// Severity attached to every message sent to a [`ResultSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Error,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives human-readable progress and result messages.
///
/// The session reports once when an operation starts and once when it ends.
pub trait ResultSink: Send + Sync {
    fn report(&self, message: &str, severity: Severity);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn report(&self, _message: &str, _severity: Severity) {}
}

/// Terminal result of a session operation
#[derive(Debug)]
pub enum Outcome {
    Created(Patient),
    Found(Patient),
    /// The patient is now selected; subsequent submits update it.
    Loaded(Patient),
    Results(Vec<Patient>),
    Updated(Patient),
    Deleted(String),
    NotFound(String),
    Failed(Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::NotFound(_) | Outcome::Failed(_))
    }

    pub fn severity(&self) -> Severity {
        if self.is_success() {
            Severity::Success
        } else {
            Severity::Error
        }
    }

    /// The single patient carried by this outcome, if any
    pub fn patient(&self) -> Option<&Patient> {
        match self {
            Outcome::Created(p) | Outcome::Found(p) | Outcome::Loaded(p) | Outcome::Updated(p) => {
                Some(p)
            }
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error().map(Error::kind)
    }

    /// Message reported to the sink for this outcome
    pub fn message(&self) -> String {
        match self {
            Outcome::Created(p) => format!(
                "Patient created: {} (ID: {})",
                p.display_name(),
                id_or_unknown(p)
            ),
            Outcome::Found(p) => format!(
                "Found patient: {} (ID: {})",
                p.display_name(),
                id_or_unknown(p)
            ),
            Outcome::Loaded(p) => format!(
                "Loaded patient for update: {} (ID: {})",
                p.display_name(),
                id_or_unknown(p)
            ),
            Outcome::Results(patients) => {
                if patients.is_empty() {
                    "No patients found".to_string()
                } else {
                    let names: Vec<String> = patients
                        .iter()
                        .map(|p| format!("{} (ID: {})", p.display_name(), id_or_unknown(p)))
                        .collect();
                    format!("Found {} patient(s): {}", patients.len(), names.join(", "))
                }
            }
            Outcome::Updated(p) => format!(
                "Patient updated: {} (ID: {})",
                p.display_name(),
                id_or_unknown(p)
            ),
            Outcome::Deleted(id) => format!("Patient deleted (ID: {})", id),
            Outcome::NotFound(id) => format!("Patient not found (ID: {})", id),
            Outcome::Failed(e) => match e.kind() {
                FailureKind::Transport => format!("Request failed: {}", e),
                FailureKind::Validation | FailureKind::Precondition => e.to_string(),
            },
        }
    }
}

fn id_or_unknown(patient: &Patient) -> &str {
    patient.id.as_deref().unwrap_or("unknown")
}
