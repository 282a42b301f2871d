//! Raw form input
//!
//! The builder never sees where its input came from: a host supplies a [`FieldSource`]
//! (a form, CLI flags, a test fixture) and [`RawFields`] snapshots the known fields.

use ferrum_models::{ContactPointSystem, Patient};
use std::collections::HashMap;

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const GENDER: &str = "gender";
pub const BIRTH_DATE: &str = "birthDate";
pub const PHONE: &str = "phone";
pub const EMAIL: &str = "email";
pub const ADDRESS: &str = "address";

/// Every field the builder reads, in form order.
pub const FIELD_NAMES: [&str; 7] = [
    FIRST_NAME, LAST_NAME, GENDER, BIRTH_DATE, PHONE, EMAIL, ADDRESS,
];

/// Source of named string fields supplied by the host application.
///
/// Missing fields are reported as an empty string.
pub trait FieldSource {
    fn get(&self, name: &str) -> String;
}

/// Flat snapshot of form fields keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    values: HashMap<String, String>,
}

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all known fields from a source
    pub fn from_source(source: &dyn FieldSource) -> Self {
        let mut fields = Self::new();
        for name in FIELD_NAMES {
            fields.set(name, source.get(name));
        }
        fields
    }

    /// Fields that reproduce a patient's editable data.
    ///
    /// Used to pre-fill the form after a patient has been loaded for update.
    pub fn from_patient(patient: &Patient) -> Self {
        let name = patient.name.first();
        let given = name
            .and_then(|n| n.given.first())
            .cloned()
            .unwrap_or_default();
        let family = name.and_then(|n| n.family.clone()).unwrap_or_default();
        let address = patient
            .address
            .first()
            .and_then(|a| a.text.clone())
            .unwrap_or_default();

        Self::new()
            .with(FIRST_NAME, given)
            .with(LAST_NAME, family)
            .with(GENDER, patient.gender.clone().unwrap_or_default())
            .with(BIRTH_DATE, patient.birth_date.clone().unwrap_or_default())
            .with(
                PHONE,
                patient
                    .telecom_value(ContactPointSystem::Phone)
                    .unwrap_or_default(),
            )
            .with(
                EMAIL,
                patient
                    .telecom_value(ContactPointSystem::Email)
                    .unwrap_or_default(),
            )
            .with(ADDRESS, address)
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Trimmed value of a field; absent fields read as empty
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(|v| v.trim()).unwrap_or("")
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.value(name).is_empty()
    }
}

impl FieldSource for RawFields {
    fn get(&self, name: &str) -> String {
        self.value(name).to_string()
    }
}

impl FieldSource for HashMap<String, String> {
    fn get(&self, name: &str) -> String {
        HashMap::get(self, name).cloned().unwrap_or_default()
    }
}
