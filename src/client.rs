//! HTTP client for the external extraction service.
//!
//! The service exposes one endpoint that takes a PDF as a multipart upload and answers with a
//! JSON envelope wrapping the hierarchy. This module only moves bytes and classifies the
//! outcome; validation happens before it is called and normalization after it returns.

use crate::error::ExtractionError;
use crate::upload::{SelectedFile, PDF_MIME};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Multipart field the service reads the upload from.
pub const UPLOAD_FIELD: &str = "file";

/// Source of raw hierarchies for a selected file.
///
/// The controller is written against this trait so the HTTP client can be swapped for an
/// in-memory one in tests.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Submits the file and returns the untouched `hierarchy` payload.
    async fn extract(&self, file: &SelectedFile) -> Result<Value, ExtractionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Liveness report from the service's health endpoint.
pub struct ServiceHealth {
    /// Service status string, `"ok"` when healthy.
    #[serde(default)]
    pub status: String,
    /// Service version.
    #[serde(default)]
    pub version: String,
}

#[derive(Clone)]
/// Extraction service client speaking HTTP.
pub struct HttpExtractor {
    client: Client,
    endpoint: String,
}

impl HttpExtractor {
    /// Builds a client for the service rooted at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Transport`] if the HTTP client cannot be initialised.
    pub fn new(endpoint: &str) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    /// Base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Probes the service's health endpoint.
    ///
    /// # Errors
    ///
    /// Classifies failures the same way as [`Extractor::extract`].
    pub async fn health(&self) -> Result<ServiceHealth, ExtractionError> {
        let url = format!("{}/health", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(remote_failure(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ExtractionError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, file: &SelectedFile) -> Result<Value, ExtractionError> {
        let url = format!("{}/extract", self.endpoint);

        let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
            ExtractionError::Transport(format!("failed to read {}: {e}", file.path.display()))
        })?;

        let part = Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(PDF_MIME)
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::info!(file = %file.file_name, size = file.size, %url, "uploading document");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = remote_failure(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %err, "extraction rejected");
            return Err(err);
        }

        parse_envelope(&body)
    }
}

/// Builds the error for a non-success response.
///
/// Uses the body's string `detail` when the body is JSON and carries one, and a generic message
/// naming the status otherwise.
#[must_use]
pub fn remote_failure(status: u16, body: &str) -> ExtractionError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("detail").and_then(Value::as_str).map(str::to_string))
        .filter(|detail| !detail.is_empty());

    ExtractionError::RemoteFailure {
        status,
        message: detail.unwrap_or_else(|| format!("API error: {status}")),
    }
}

/// Unwraps the hierarchy from a success envelope `{ ok, hierarchy }`.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidResponse`] if the body is not JSON, `ok` is not truthy, or
/// `hierarchy` is missing or falsy.
pub fn parse_envelope(body: &str) -> Result<Value, ExtractionError> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| ExtractionError::InvalidResponse(format!("body is not JSON: {e}")))?;

    let Value::Object(mut fields) = envelope else {
        return Err(ExtractionError::InvalidResponse(
            "envelope is not an object".to_string(),
        ));
    };

    if !fields.get("ok").is_some_and(is_truthy) {
        return Err(ExtractionError::InvalidResponse(
            "`ok` flag is not set".to_string(),
        ));
    }

    if let Some(duration) = fields.get("duration_sec").and_then(Value::as_f64) {
        tracing::info!(duration_sec = duration, "extraction completed");
    }

    match fields.remove("hierarchy") {
        Some(hierarchy) if is_truthy(&hierarchy) => Ok(hierarchy),
        _ => Err(ExtractionError::InvalidResponse(
            "`hierarchy` is missing".to_string(),
        )),
    }
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "tests/client.rs"]
mod tests;
