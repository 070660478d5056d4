use sidecar_core::{CoreError, Diagnostic, Response, Status};
use thiserror::Error;

/// Extension specific errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("Invalid argument: {0}")]
    Argument(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Provisioning error: {0}")]
    Provisioning(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Random source unavailable: {0}")]
    RandomSource(String),
}

impl ExtensionError {
    pub fn code(&self) -> &'static str {
        match self {
            ExtensionError::Argument(_) => "INVALID_ARGUMENT",
            ExtensionError::Configuration(_) => "CONFIGURATION_ERROR",
            ExtensionError::Connection(_) => "CONNECTION_ERROR",
            ExtensionError::Provisioning(_) => "PROVISIONING_ERROR",
            ExtensionError::Serialization(_) => "SERIALIZATION_ERROR",
            ExtensionError::Io(_) => "IO_ERROR",
            ExtensionError::RandomSource(_) => "RANDOM_SOURCE_ERROR",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExtensionError::Argument(_) => "argument",
            ExtensionError::Configuration(_) => "configuration",
            ExtensionError::Connection(_) => "connection",
            ExtensionError::Provisioning(_) => "provisioning",
            ExtensionError::Serialization(_) => "serialization",
            ExtensionError::Io(_) => "io",
            ExtensionError::RandomSource(_) => "random_source",
        }
    }
}

impl From<CoreError> for ExtensionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Argument(msg) => ExtensionError::Argument(msg),
            CoreError::Connection(msg) => ExtensionError::Connection(msg),
            CoreError::Provisioning(msg) => ExtensionError::Provisioning(msg),
            CoreError::Serialization(msg) => ExtensionError::Serialization(msg),
            CoreError::Io(msg) => ExtensionError::Io(msg),
            CoreError::RandomSource(msg) => ExtensionError::RandomSource(msg),
        }
    }
}

impl From<&ExtensionError> for Response {
    fn from(err: &ExtensionError) -> Self {
        let message = err.to_string();
        Response::failed(message.clone()).with_diagnostic(Diagnostic::new(
            err.kind(),
            err.code(),
            message,
            Status::Failed,
        ))
    }
}

pub type ExtensionResult<T> = std::result::Result<T, ExtensionError>;
