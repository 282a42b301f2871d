//! Configuration for the patient manager
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. `patient-manager.{toml,yaml,json}` in the working directory, or the file given
//!    with `--config`
//! 3. `.env` and `PATIENT_MANAGER__*` environment variables
//!    (e.g. `PATIENT_MANAGER__FHIR__BASE_URL`)
//! 4. command-line flags, applied by the caller

use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://hapi.fhir.org/baseR4";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub fhir: FhirConfig,
    pub logging: LoggingConfig,
}

/// FHIR server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FhirConfig {
    /// Base URL of the FHIR REST endpoint
    pub base_url: String,

    /// Per-request timeout enforced by the HTTP transport
    pub timeout_seconds: u64,
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this application's own targets; `RUST_LOG` overrides it entirely
    pub level: String,

    /// Emit JSON lines instead of human-readable logs
    pub json: bool,

    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// daily | hourly | minutely | never
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "patient-manager".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the optional file, `.env` and the environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let file_source = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("patient-manager").required(false),
        };

        Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix("PATIENT_MANAGER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        let base_url = self.fhir.base_url.trim();
        if base_url.is_empty() {
            return Err("fhir.base_url must not be empty".to_string());
        }

        let parsed = url::Url::parse(base_url)
            .map_err(|e| format!("fhir.base_url '{}' is not a valid URL: {}", base_url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!(
                "fhir.base_url must use http or https, got '{}'",
                parsed.scheme()
            ));
        }

        if self.fhir.timeout_seconds == 0 {
            return Err("fhir.timeout_seconds must be greater than zero".to_string());
        }

        if !matches!(
            self.logging.file_rotation.as_str(),
            "daily" | "hourly" | "minutely" | "never"
        ) {
            return Err(format!(
                "logging.file_rotation must be daily, hourly, minutely or never, got '{}'",
                self.logging.file_rotation
            ));
        }

        Ok(())
    }
}
