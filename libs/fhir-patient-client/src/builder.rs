//! Build a Patient resource from raw form fields

use crate::error::ValidationError;
use crate::fields::{RawFields, ADDRESS, BIRTH_DATE, EMAIL, FIRST_NAME, GENDER, LAST_NAME, PHONE};
use crate::validation::{is_valid_email, is_valid_phone, parse_birth_date};
use chrono::{Local, NaiveDate};
use ferrum_models::{Address, ContactPoint, ContactPointSystem, HumanName, Patient};

/// Validates raw input and assembles a normalized [`Patient`].
///
/// Checks run in a fixed order and the first failing rule is returned, so the caller
/// always gets the single most actionable problem.
#[derive(Debug, Clone, Default)]
pub struct ResourceBuilder {
    today: Option<NaiveDate>,
}

impl ResourceBuilder {
    /// Builder that compares birth dates against the local calendar date
    pub fn new() -> Self {
        Self { today: None }
    }

    /// Builder with a fixed notion of "today"
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn build(&self, raw: &RawFields) -> Result<Patient, ValidationError> {
        self.validate(raw)?;

        let mut patient = Patient::new();
        patient.active = Some(true);
        patient.name.push(HumanName {
            name_use: Some("official".to_string()),
            family: Some(raw.value(LAST_NAME).to_string()),
            given: vec![raw.value(FIRST_NAME).to_string()],
            ..Default::default()
        });
        patient.gender = Some(raw.value(GENDER).to_string());
        patient.birth_date = Some(raw.value(BIRTH_DATE).to_string());

        if !raw.is_blank(PHONE) {
            patient.telecom.push(ContactPoint::new(
                ContactPointSystem::Phone,
                raw.value(PHONE),
                "home",
            ));
        }
        if !raw.is_blank(EMAIL) {
            patient.telecom.push(ContactPoint::new(
                ContactPointSystem::Email,
                raw.value(EMAIL),
                "home",
            ));
        }
        if !raw.is_blank(ADDRESS) {
            patient.address.push(Address {
                address_use: Some("home".to_string()),
                address_type: Some("both".to_string()),
                text: Some(raw.value(ADDRESS).to_string()),
                ..Default::default()
            });
        }

        Ok(patient)
    }

    fn validate(&self, raw: &RawFields) -> Result<(), ValidationError> {
        if raw.is_blank(FIRST_NAME) {
            return Err(ValidationError::FirstNameRequired);
        }
        if raw.is_blank(LAST_NAME) {
            return Err(ValidationError::LastNameRequired);
        }
        if raw.is_blank(GENDER) {
            return Err(ValidationError::GenderRequired);
        }
        if raw.is_blank(BIRTH_DATE) {
            return Err(ValidationError::BirthDateRequired);
        }

        let birth_date =
            parse_birth_date(raw.value(BIRTH_DATE)).ok_or(ValidationError::InvalidDate)?;
        if birth_date > self.today() {
            return Err(ValidationError::BirthDateInFuture);
        }

        if !raw.is_blank(EMAIL) && !is_valid_email(raw.value(EMAIL)) {
            return Err(ValidationError::InvalidEmail);
        }
        if !raw.is_blank(PHONE) && !is_valid_phone(raw.value(PHONE)) {
            return Err(ValidationError::InvalidPhone);
        }

        Ok(())
    }
}
