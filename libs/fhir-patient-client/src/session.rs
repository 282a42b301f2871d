//! Patient session: selection state and request orchestration
//!
//! A session holds at most one selected patient. Create, load-for-update and update
//! select a patient; delete and an explicit clear drop the selection. Every operation
//! sends at most one request, reports an info message when it starts and a result
//! message when it ends, and leaves the selection untouched unless it succeeded.

use crate::builder::ResourceBuilder;
use crate::error::{Error, Result};
use crate::fields::RawFields;
use crate::outcome::{Outcome, ResultSink, Severity};
use crate::transport::{FhirRequest, FhirResponse, FhirTransport};
use crate::validation::{validate_patient, ValidationResult};
use ferrum_models::{patients_from_response, Patient};
use reqwest::Method;
use std::sync::Arc;

const RESOURCE_TYPE: &str = "Patient";

/// Whether the next submit creates a new patient or updates the selected one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Idle,
    Editing,
}

pub struct PatientSession {
    base_url: String,
    transport: Arc<dyn FhirTransport>,
    sink: Arc<dyn ResultSink>,
    builder: ResourceBuilder,
    selected: Option<Patient>,
}

impl PatientSession {
    /// Create a session against `base_url` (trailing slashes are dropped).
    pub fn new(
        base_url: impl AsRef<str>,
        transport: Arc<dyn FhirTransport>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            transport,
            sink,
            builder: ResourceBuilder::new(),
            selected: None,
        }
    }

    /// Replace the resource builder (e.g. one with a fixed date)
    pub fn with_builder(mut self, builder: ResourceBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn selected(&self) -> Option<&Patient> {
        self.selected.as_ref()
    }

    pub fn mode(&self) -> SessionMode {
        if self.selected.is_some() {
            SessionMode::Editing
        } else {
            SessionMode::Idle
        }
    }

    /// Drop the selection, returning to create mode
    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            tracing::info!(id = ?previous.id, "Selection cleared");
        }
    }

    /// Run the standalone validator over the selected patient
    pub fn validate_selected(&self) -> Option<ValidationResult> {
        self.selected
            .as_ref()
            .map(|patient| validate_patient(patient, self.builder.today()))
    }

    /// Create when idle, update the selected patient when editing
    pub async fn submit(&mut self, raw: &RawFields) -> Outcome {
        match self.mode() {
            SessionMode::Idle => self.create(raw).await,
            SessionMode::Editing => self.update_selected(raw).await,
        }
    }

    pub async fn create(&mut self, raw: &RawFields) -> Outcome {
        self.begin("Creating patient...");
        let result = self.try_create(raw).await;
        self.finish("create", result)
    }

    pub async fn fetch_by_id(&mut self, id: &str) -> Outcome {
        let id = id.trim();
        self.begin(&format!("Fetching patient {}...", id));
        let result = self.try_fetch(id).await.map(|found| match found {
            Some(patient) => Outcome::Found(patient),
            None => Outcome::NotFound(id.to_string()),
        });
        self.finish("fetch", result)
    }

    pub async fn search_by_name(&mut self, term: &str) -> Outcome {
        let term = term.trim();
        self.begin(&format!("Searching patients by name '{}'...", term));
        let result = self.try_search(term).await;
        self.finish("search", result)
    }

    /// Fetch a patient and select it for editing
    pub async fn load_for_update(&mut self, id: &str) -> Outcome {
        let id = id.trim();
        self.begin(&format!("Loading patient {} for update...", id));
        let result = match self.try_fetch(id).await {
            Ok(Some(patient)) => {
                self.selected = Some(patient.clone());
                Ok(Outcome::Loaded(patient))
            }
            Ok(None) => Ok(Outcome::NotFound(id.to_string())),
            Err(e) => Err(e),
        };
        self.finish("load", result)
    }

    pub async fn update_selected(&mut self, raw: &RawFields) -> Outcome {
        let message = match self.selected.as_ref().and_then(|p| p.id.as_deref()) {
            Some(id) => format!("Updating patient {}...", id),
            None => "Updating selected patient...".to_string(),
        };
        self.begin(&message);
        let result = self.try_update(raw).await;
        self.finish("update", result)
    }

    /// Delete the patient with `id`.
    ///
    /// Confirmation is the caller's job. A successful delete clears the selection even
    /// when `id` is not the selected patient.
    pub async fn delete_selected(&mut self, id: &str) -> Outcome {
        let id = id.trim();
        self.begin(&format!("Deleting patient {}...", id));
        let result = self.try_delete(id).await;
        self.finish("delete", result)
    }

    async fn try_create(&mut self, raw: &RawFields) -> Result<Outcome> {
        let patient = self.builder.build(raw)?;
        let request = FhirRequest::new(Method::POST, self.type_url()).with_body(patient.to_value()?);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(status_error(response));
        }

        let created = parse_patient(&response)?;
        tracing::info!(id = ?created.id, "Patient created and selected");
        self.selected = Some(created.clone());
        Ok(Outcome::Created(created))
    }

    /// `Ok(None)` when the server answers 404
    async fn try_fetch(&self, id: &str) -> Result<Option<Patient>> {
        require("Patient ID", id)?;
        let request = FhirRequest::new(Method::GET, self.instance_url(id));

        let response = self.transport.send(request).await?;
        if response.is_not_found() {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(status_error(response));
        }

        let mut patients = patients_from_response(&response.json()?)?;
        if patients.is_empty() {
            return Ok(None);
        }
        Ok(Some(patients.swap_remove(0)))
    }

    async fn try_search(&self, term: &str) -> Result<Outcome> {
        require("Search term", term)?;
        let request = FhirRequest::new(Method::GET, self.type_url()).with_query("name", term);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(status_error(response));
        }

        let patients = patients_from_response(&response.json()?)?;
        tracing::debug!(count = patients.len(), "Search completed");
        Ok(Outcome::Results(patients))
    }

    async fn try_update(&mut self, raw: &RawFields) -> Result<Outcome> {
        let Some(selected) = self.selected.as_ref() else {
            return Err(Error::Precondition("No patient selected".to_string()));
        };
        let Some(id) = selected.id.clone().filter(|id| !id.trim().is_empty()) else {
            return Err(Error::Precondition(
                "Selected patient has no ID".to_string(),
            ));
        };

        let mut patient = self.builder.build(raw)?;
        patient.id = Some(id.clone());
        let request =
            FhirRequest::new(Method::PUT, self.instance_url(&id)).with_body(patient.to_value()?);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(status_error(response));
        }

        // Servers honouring `Prefer: return=minimal` answer with an empty body.
        let updated = if response.body.trim().is_empty() {
            patient
        } else {
            parse_patient(&response)?
        };
        tracing::info!(id = %id, "Selected patient updated");
        self.selected = Some(updated.clone());
        Ok(Outcome::Updated(updated))
    }

    async fn try_delete(&mut self, id: &str) -> Result<Outcome> {
        require("Patient ID", id)?;
        let request = FhirRequest::new(Method::DELETE, self.instance_url(id));

        let response = self.transport.send(request).await?;
        if response.is_not_found() {
            return Ok(Outcome::NotFound(id.to_string()));
        }
        if !response.is_success() {
            return Err(status_error(response));
        }

        if let Some(selected_id) = self.selected.as_ref().and_then(|p| p.id.as_deref()) {
            if selected_id != id {
                tracing::debug!(
                    deleted = %id,
                    selected = %selected_id,
                    "Deleted patient differs from selection; clearing selection anyway"
                );
            }
        }
        self.selected = None;
        Ok(Outcome::Deleted(id.to_string()))
    }

    fn type_url(&self) -> String {
        format!("{}/{}", self.base_url, RESOURCE_TYPE)
    }

    fn instance_url(&self, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            RESOURCE_TYPE,
            urlencoding::encode(id)
        )
    }

    fn begin(&self, message: &str) {
        self.sink.report(message, Severity::Info);
    }

    fn finish(&self, operation: &'static str, result: Result<Outcome>) -> Outcome {
        let outcome = result.unwrap_or_else(Outcome::Failed);
        let message = outcome.message();

        match &outcome {
            Outcome::Failed(e) => {
                tracing::warn!(operation, kind = ?e.kind(), status = ?e.status(), "{}", message)
            }
            Outcome::NotFound(_) => tracing::info!(operation, "{}", message),
            _ => tracing::debug!(operation, "{}", message),
        }

        self.sink.report(&message, outcome.severity());
        outcome
    }
}

fn require(label: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Precondition(format!("{} is required", label)));
    }
    Ok(())
}

fn status_error(response: FhirResponse) -> Error {
    Error::Status {
        status: response.status,
        body: response.body,
    }
}

fn parse_patient(response: &FhirResponse) -> Result<Patient> {
    Ok(Patient::from_value(&response.json()?)?)
}
