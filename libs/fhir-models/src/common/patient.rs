//! FHIR Patient model
//!
//! Covers the demographic subset the patient manager reads and writes: name, gender,
//! birth date, contact points and a free-text address. Anything else the server returns
//! (meta, identifiers, extensions) is kept in `extensions` so a loaded resource can be
//! inspected without loss.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Display name used when a patient carries no usable name parts.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

/// FHIR Patient resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Resource type - always "Patient"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id, assigned by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Whether this patient's record is in active use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// A name associated with the patient
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    /// male | female | other | unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// The date of birth for the individual (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    /// A contact detail for the individual
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,

    /// An address for the individual
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,

    /// Additional content beyond the modelled fields (meta, identifier, extension, ...)
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Patient".to_string()
}

/// Name of a human
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HumanName {
    /// usual | official | temp | nickname | anonymous | old | maiden
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,

    /// Text representation of the full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Family name (often called 'Surname')
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Given names (not always 'first'). Includes middle names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Details of a technology mediated contact point (phone, email, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<ContactPointSystem>,

    /// The actual contact point details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// home | work | temp | old | mobile
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub contact_use: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Telecommunications form for a contact point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPointSystem {
    Phone,
    Fax,
    Email,
    Pager,
    Url,
    Sms,
    Other,
}

/// An address expressed using postal conventions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// home | work | temp | old | billing
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub address_use: Option<String>,

    /// postal | physical | both
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,

    /// Text representation of the address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Administrative gender value set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

impl AdministrativeGender {
    pub const ALL: [AdministrativeGender; 4] = [
        AdministrativeGender::Male,
        AdministrativeGender::Female,
        AdministrativeGender::Other,
        AdministrativeGender::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdministrativeGender::Male => "male",
            AdministrativeGender::Female => "female",
            AdministrativeGender::Other => "other",
            AdministrativeGender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AdministrativeGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdministrativeGender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| Error::InvalidCode {
                field: "gender",
                value: s.to_string(),
            })
    }
}

impl Patient {
    /// Create an empty Patient with only the resource type set
    pub fn new() -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            active: None,
            name: Vec::new(),
            gender: None,
            birth_date: None,
            telecom: Vec::new(),
            address: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    /// Parse from JSON Value
    pub fn from_value(value: &Value) -> Result<Self> {
        let patient: Patient = serde_json::from_value(value.clone())?;
        if patient.resource_type != "Patient" {
            return Err(Error::unexpected_type("Patient", &patient.resource_type));
        }
        Ok(patient)
    }

    /// Convert to JSON Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    /// Given names followed by the family name of the first name entry.
    ///
    /// Falls back to [`UNKNOWN_DISPLAY_NAME`] when nothing is left after trimming.
    pub fn display_name(&self) -> String {
        let joined = self
            .name
            .first()
            .map(|name| {
                let mut parts: Vec<&str> = name.given.iter().map(String::as_str).collect();
                if let Some(family) = name.family.as_deref() {
                    parts.push(family);
                }
                parts.join(" ")
            })
            .unwrap_or_default();

        let trimmed = joined.trim();
        if trimmed.is_empty() {
            UNKNOWN_DISPLAY_NAME.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// First telecom value for the given system
    pub fn telecom_value(&self, system: ContactPointSystem) -> Option<&str> {
        self.telecom
            .iter()
            .find(|cp| cp.system == Some(system))
            .and_then(|cp| cp.value.as_deref())
    }

    /// Parsed gender, if present and part of the value set
    pub fn administrative_gender(&self) -> Option<AdministrativeGender> {
        self.gender.as_deref().and_then(|g| g.parse().ok())
    }
}

impl Default for Patient {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactPoint {
    pub fn new(system: ContactPointSystem, value: impl Into<String>, contact_use: &str) -> Self {
        Self {
            system: Some(system),
            value: Some(value.into()),
            contact_use: Some(contact_use.to_string()),
            extensions: HashMap::new(),
        }
    }
}
