//! FHIR Patient client
//!
//! Validates loosely-structured form input, turns it into a Patient resource and drives
//! create/read/search/update/delete interactions against a FHIR REST server, tracking
//! which patient is currently selected for editing.
//!
//! The host supplies three capabilities: a [`FhirTransport`] (normally [`HttpTransport`]),
//! a [`ResultSink`] for user-facing messages and a [`FieldSource`] for raw input.
//!
//! # Example
//!
//! ```rust,no_run
//! use ferrum_patient_client::{HttpTransport, NullSink, PatientSession, RawFields};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new()?);
//! let mut session = PatientSession::new("https://hapi.fhir.org/baseR4", transport, Arc::new(NullSink));
//!
//! let fields = RawFields::new()
//!     .with("firstName", "Ada")
//!     .with("lastName", "Lovelace")
//!     .with("gender", "female")
//!     .with("birthDate", "1815-12-10");
//!
//! let outcome = session.create(&fields).await;
//! println!("{}", outcome.message());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod fields;
pub mod outcome;
pub mod session;
pub mod transport;
pub mod validation;

pub use builder::ResourceBuilder;
pub use error::{Error, FailureKind, Result, ValidationError};
pub use fields::{FieldSource, RawFields};
pub use outcome::{NullSink, Outcome, ResultSink, Severity};
pub use session::{PatientSession, SessionMode};
pub use transport::{FhirRequest, FhirResponse, FhirTransport, HttpTransport, FHIR_JSON};
pub use validation::{validate_patient, ValidationResult};

// Re-export the resource model for convenience
pub use ferrum_models::Patient;
