pub mod credentials;
pub mod identity;
pub mod request;
pub mod response;

use thiserror::Error;

pub use credentials::generate_secret;
pub use identity::{derive_username, normalize_identifier};
pub use request::Request;
pub use response::{Diagnostic, Response, Status};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    Argument(String),
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

impl CoreError {
    /// Short category name, used as the diagnostic name in failure responses.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Argument(_) => "argument",
            CoreError::Connection(_) => "connection",
            CoreError::Provisioning(_) => "provisioning",
            CoreError::Serialization(_) => "serialization",
            CoreError::Io(_) => "io",
            CoreError::RandomSource(_) => "random_source",
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
