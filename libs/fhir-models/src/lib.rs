//! FHIR data models
//!
//! Strongly-typed structures for the resources the patient manager exchanges with a
//! FHIR server.
//!
//! # Module Organization
//!
//! - `common`: Version-agnostic models that work across FHIR R4, R4B, and R5
//!
//! Fields that are not modelled explicitly are preserved in an `extensions` map, so
//! resources read from a server round-trip through these types.
//!
//! # Example
//!
//! ```rust
//! use ferrum_models::common::Patient;
//! use serde_json::json;
//!
//! let patient = Patient::from_value(&json!({
//!     "resourceType": "Patient",
//!     "id": "42",
//!     "name": [{"family": "Lovelace", "given": ["Ada"]}],
//!     "gender": "female",
//!     "birthDate": "1815-12-10"
//! }))
//! .unwrap();
//!
//! assert_eq!(patient.display_name(), "Ada Lovelace");
//! ```

pub mod common;

// Re-export commonly used types
pub use common::*;
