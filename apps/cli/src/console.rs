//! Terminal adapters: field input from command flags, results printed to stdout

use clap::Args;
use ferrum_patient_client::fields::{
    ADDRESS, BIRTH_DATE, EMAIL, FIRST_NAME, GENDER, LAST_NAME, PHONE,
};
use ferrum_patient_client::{FieldSource, RawFields, ResultSink, Severity};

/// Prints every report on its own line with a severity tag
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn report(&self, message: &str, severity: Severity) {
        let tag = match severity {
            Severity::Info => "info",
            Severity::Error => "error",
            Severity::Success => " ok ",
        };
        println!("[{}] {}", tag, message);
    }
}

/// Patient form fields as command flags
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// male | female | other | unknown
    #[arg(long)]
    pub gender: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Free-text home address
    #[arg(long)]
    pub address: Option<String>,
}

impl PatientArgs {
    fn field(&self, name: &str) -> Option<&String> {
        match name {
            FIRST_NAME => self.first_name.as_ref(),
            LAST_NAME => self.last_name.as_ref(),
            GENDER => self.gender.as_ref(),
            BIRTH_DATE => self.birth_date.as_ref(),
            PHONE => self.phone.as_ref(),
            EMAIL => self.email.as_ref(),
            ADDRESS => self.address.as_ref(),
            _ => None,
        }
    }

    /// Overlay the flags that were given on top of `base`.
    ///
    /// Mirrors editing a pre-filled form: untouched fields keep their value, and a flag
    /// given as an empty string clears the field.
    pub fn merged_onto(&self, mut base: RawFields) -> RawFields {
        for name in ferrum_patient_client::fields::FIELD_NAMES {
            if let Some(value) = self.field(name) {
                base.set(name, value.clone());
            }
        }
        base
    }
}

impl FieldSource for PatientArgs {
    fn get(&self, name: &str) -> String {
        self.field(name).cloned().unwrap_or_default()
    }
}
