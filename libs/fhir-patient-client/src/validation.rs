//! Field rules and the standalone Patient validator
//!
//! The builder gates submission and stops at the first problem. [`validate_patient`]
//! is for resources already in hand (typically one loaded from the server) and
//! collects every problem it finds.

use chrono::NaiveDate;
use ferrum_models::{AdministrativeGender, ContactPointSystem, Patient};
use regex::Regex;
use std::sync::OnceLock;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("valid phone regex"))
}

/// `local@domain.tld` with no whitespace and a single `@`
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Digits with an optional leading `+` and no leading zero, at most 16 digits.
///
/// Spaces, hyphens and parentheses are ignored.
pub fn is_valid_phone(value: &str) -> bool {
    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    phone_regex().is_match(&stripped)
}

fn date_regex() -> &'static Regex {
    static DATE: OnceLock<Regex> = OnceLock::new();
    DATE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"))
}

/// Parse an ISO calendar date (`YYYY-MM-DD`, zero-padded, ASCII digits only)
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    if !date_regex().is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Result of checking a resource after the fact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check a Patient against the manager's field rules, collecting every error.
///
/// `today` bounds the birth date; callers normally pass the local date.
pub fn validate_patient(patient: &Patient, today: NaiveDate) -> ValidationResult {
    let mut errors = Vec::new();

    if patient.resource_type != "Patient" {
        errors.push(format!(
            "resourceType must be 'Patient', found '{}'",
            patient.resource_type
        ));
    }

    let has_name = patient.name.iter().any(|name| {
        name.family.as_deref().is_some_and(|f| !f.trim().is_empty())
            || name.given.iter().any(|g| !g.trim().is_empty())
    });
    if !has_name {
        errors.push("Patient must have at least one name".to_string());
    }

    match patient.gender.as_deref() {
        None | Some("") => errors.push("Gender is required".to_string()),
        Some(gender) => {
            if gender.parse::<AdministrativeGender>().is_err() {
                let allowed: Vec<&str> = AdministrativeGender::ALL
                    .iter()
                    .map(AdministrativeGender::as_str)
                    .collect();
                errors.push(format!(
                    "Invalid gender '{}', expected one of: {}",
                    gender,
                    allowed.join(", ")
                ));
            }
        }
    }

    match patient.birth_date.as_deref() {
        None | Some("") => errors.push("Birth date is required".to_string()),
        Some(raw) => match parse_birth_date(raw) {
            None => errors.push(format!("Invalid birth date '{}'", raw)),
            Some(date) if date > today => {
                errors.push(format!("Birth date {} is in the future", raw))
            }
            Some(_) => {}
        },
    }

    for contact in &patient.telecom {
        let value = contact.value.as_deref().unwrap_or("");
        match contact.system {
            Some(ContactPointSystem::Email) if !is_valid_email(value) => {
                errors.push(format!("Invalid email '{}'", value));
            }
            Some(ContactPointSystem::Phone) if !is_valid_phone(value) => {
                errors.push(format!("Invalid phone number '{}'", value));
            }
            _ => {}
        }
    }

    ValidationResult::from_errors(errors)
}
