use ferrum_patient_client::fields::{BIRTH_DATE, FIRST_NAME, GENDER, LAST_NAME};
use ferrum_patient_client::RawFields;
use serde_json::{json, Value};

/// Form input for Ada Lovelace with only the required fields
pub fn ada_fields() -> RawFields {
    RawFields::new()
        .with(FIRST_NAME, "Ada")
        .with(LAST_NAME, "Lovelace")
        .with(GENDER, "female")
        .with(BIRTH_DATE, "1815-12-10")
}

/// Server representation of Ada Lovelace
pub fn ada_resource(id: &str) -> Value {
    json!({
        "resourceType": "Patient",
        "id": id,
        "meta": {"versionId": "1", "lastUpdated": "2024-05-30T10:00:00Z"},
        "active": true,
        "name": [{"use": "official", "family": "Lovelace", "given": ["Ada"]}],
        "gender": "female",
        "birthDate": "1815-12-10"
    })
}

pub fn patient_resource(id: &str, given: &str, family: &str) -> Value {
    json!({
        "resourceType": "Patient",
        "id": id,
        "name": [{"family": family, "given": [given]}],
        "gender": "unknown",
        "birthDate": "1970-01-01"
    })
}

/// Searchset bundle wrapping the given resources
pub fn search_bundle(resources: Vec<Value>) -> Value {
    let entries: Vec<Value> = resources
        .into_iter()
        .map(|resource| {
            let url = format!(
                "http://fhir.test/baseR4/Patient/{}",
                resource["id"].as_str().unwrap_or_default()
            );
            json!({"fullUrl": url, "resource": resource, "search": {"mode": "match"}})
        })
        .collect();

    let mut bundle = json!({
        "resourceType": "Bundle",
        "type": "searchset",
        "total": entries.len()
    });
    if !entries.is_empty() {
        bundle["entry"] = Value::Array(entries);
    }
    bundle
}

pub fn operation_outcome(diagnostics: &str) -> Value {
    json!({
        "resourceType": "OperationOutcome",
        "issue": [{"severity": "error", "code": "processing", "diagnostics": diagnostics}]
    })
}
