//! HTTP transport for FHIR REST interactions

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

/// Media type for FHIR JSON bodies
pub const FHIR_JSON: &str = "application/fhir+json";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A single request to a FHIR endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FhirRequest {
    pub method: Method,
    /// Absolute URL without query string
    pub url: String,
    /// Raw query parameters; the transport percent-encodes them
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl FhirRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// URL with the percent-encoded query string appended
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.url, query.join("&"))
    }
}

/// Status and raw body of a completed exchange.
///
/// Any status is a valid response here; interpreting it is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FhirResponse {
    pub status: u16,
    pub body: String,
}

impl FhirResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Err(Error::MalformedResponse(format!(
                "empty body with status {}",
                self.status
            )));
        }
        serde_json::from_str(&self.body).map_err(Error::from)
    }
}

/// Capability to exchange requests with a FHIR server.
///
/// Errors are reserved for exchanges that produced no HTTP response at all
/// (connection refused, timeout, unreadable body).
#[async_trait]
pub trait FhirTransport: Send + Sync {
    async fn send(&self, request: FhirRequest) -> Result<FhirResponse>;
}

/// [`FhirTransport`] backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default 30 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FhirTransport for HttpTransport {
    async fn send(&self, request: FhirRequest) -> Result<FhirResponse> {
        let url = request.full_url();
        tracing::debug!(method = %request.method, url = %url, "Sending FHIR request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(ACCEPT, FHIR_JSON);

        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, FHIR_JSON)
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, bytes = body.len(), "Received FHIR response");
        Ok(FhirResponse { status, body })
    }
}
