//! Outcome record written back to the invoking orchestrator.
//!
//! Wire schema `csm-response/v1`:
//! `{"http_code": int, "details": any, "status": string, "processing_type": string}`
//! with an optional `diagnostics` array that is omitted when empty.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RESPONSE_SCHEMA_VERSION: &str = "csm-response/v1";

/// `processing_type` of every response unless a label is configured.
pub const DEFAULT_PROCESSING_TYPE: &str = "Extension";

pub const HTTP_OK: u16 = 200;
pub const HTTP_NOT_FOUND: u16 = 404;
pub const HTTP_INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    None,
    Unknown,
    Successful,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub description: String,
    pub message: String,
    pub name: String,
    pub status: Status,
}

impl Diagnostic {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        message: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            description: description.into(),
            message: message.into(),
            name: name.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub http_code: u16,
    pub details: Value,
    pub status: Status,
    pub processing_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    pub fn new(http_code: u16, details: Value, status: Status) -> Self {
        Self {
            http_code,
            details,
            status,
            processing_type: DEFAULT_PROCESSING_TYPE.to_string(),
            diagnostics: Vec::new(),
        }
    }

    /// Successful outcome without payload.
    pub fn successful(http_code: u16) -> Self {
        Self::new(http_code, Value::String(String::new()), Status::Successful)
    }

    /// Outcome of an existence check: a missing resource is still a
    /// successful operation, reported with 404.
    pub fn found(exists: bool) -> Self {
        if exists {
            Self::successful(HTTP_OK)
        } else {
            Self::successful(HTTP_NOT_FOUND)
        }
    }

    /// Successful outcome carrying a serialized payload.
    pub fn with_payload<T: Serialize>(http_code: u16, payload: &T) -> Result<Self> {
        let details = serde_json::to_value(payload)?;
        Ok(Self::new(http_code, details, Status::Successful))
    }

    /// Failed outcome whose details are exactly `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(
            HTTP_INTERNAL_ERROR,
            Value::String(message.into()),
            Status::Failed,
        )
    }

    pub fn with_processing_type(mut self, processing_type: impl Into<String>) -> Self {
        self.processing_type = processing_type.into();
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    pub fn is_failed(&self) -> bool {
        self.status == Status::Failed
    }

    /// Encode to the wire format.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

impl From<&CoreError> for Response {
    fn from(err: &CoreError) -> Self {
        let message = err.to_string();
        Response::failed(message.clone()).with_diagnostic(Diagnostic::new(
            err.kind(),
            "operation aborted",
            message,
            Status::Failed,
        ))
    }
}
