//! FHIR Bundle model
//!
//! Only the parts a search client reads: the bundle type, the total and the entry list.

use super::error::{Error, Result};
use super::patient::Patient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// FHIR Bundle resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Resource type - always "Bundle"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Purpose of the bundle; servers always send it, but a missing type is tolerated
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<BundleType>,

    /// If search, the total number of matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    /// Entry in the bundle - will have a resource or information
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,

    /// Links, signature and anything else not modelled here
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Bundle".to_string()
}

/// Type of Bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    History,
    Searchset,
    Collection,
    SubscriptionNotification,
}

/// Entry in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// A resource in this bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    /// Search, request and response details
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl Bundle {
    /// Create an empty searchset bundle
    pub fn searchset() -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            bundle_type: Some(BundleType::Searchset),
            total: Some(0),
            entry: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    /// Parse from JSON Value
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::from)
    }

    pub fn is_searchset(&self) -> bool {
        matches!(self.bundle_type, Some(BundleType::Searchset))
    }

    /// Add a resource entry to the bundle
    pub fn add_resource(&mut self, resource: Value) {
        self.entry.push(BundleEntry {
            full_url: None,
            resource: Some(resource),
            extensions: HashMap::new(),
        });
    }

    /// Patient resources carried by the entries, in entry order.
    ///
    /// Entries without a resource and entries holding other resource types
    /// (OperationOutcome hints, `_include`d resources) are skipped. A Patient entry
    /// that does not deserialize is skipped with a warning so the remaining matches
    /// are still returned.
    pub fn patients(&self) -> Vec<Patient> {
        self.entry
            .iter()
            .filter_map(|entry| {
                let resource = entry.resource.as_ref()?;
                if resource_type_of(resource) != Some("Patient") {
                    return None;
                }
                match Patient::from_value(resource) {
                    Ok(patient) => Some(patient),
                    Err(e) => {
                        tracing::warn!(
                            full_url = ?entry.full_url,
                            id = ?resource.get("id"),
                            error = %e,
                            "Skipping malformed Patient entry"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

/// Value of the `resourceType` property, if any
pub fn resource_type_of(value: &Value) -> Option<&str> {
    value.get("resourceType").and_then(Value::as_str)
}

/// Patients contained in a read or search response body.
///
/// The body is either a Bundle (whose entries are unwrapped) or a single Patient.
pub fn patients_from_response(value: &Value) -> Result<Vec<Patient>> {
    match resource_type_of(value) {
        Some("Bundle") => Ok(Bundle::from_value(value)?.patients()),
        Some("Patient") => Ok(vec![Patient::from_value(value)?]),
        Some(other) => Err(Error::unexpected_type("Bundle or Patient", other)),
        None => Err(Error::MissingField("resourceType".to_string())),
    }
}
