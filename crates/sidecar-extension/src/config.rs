use crate::shared::error::{ExtensionError, ExtensionResult};
use crate::shared::types::BindingConfig;
use sidecar_core::credentials::DEFAULT_SECRET_BYTES;
use sidecar_core::identity::{DEFAULT_USERNAME_LEN, MAX_USERNAME_LEN};
use sidecar_core::response::DEFAULT_PROCESSING_TYPE;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATA_DIR: &str = "./sidecar-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Directory,
}

impl FromStr for BackendKind {
    type Err = ExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "directory" => Ok(BackendKind::Directory),
            other => Err(ExtensionError::Configuration(format!(
                "SIDECAR_BACKEND must be memory or directory, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    pub backend: BackendKind,
    pub data_dir: PathBuf,
    pub binding: BindingConfig,
    pub service_label: String,
    pub username_length: usize,
    pub secret_bytes: usize,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Directory,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            binding: BindingConfig::default(),
            service_label: DEFAULT_PROCESSING_TYPE.to_string(),
            username_length: DEFAULT_USERNAME_LEN,
            secret_bytes: DEFAULT_SECRET_BYTES,
        }
    }
}

impl ExtensionConfig {
    pub fn from_env() -> ExtensionResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> ExtensionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("SIDECAR_BACKEND") {
            config.backend = value.parse()?;
        }
        if let Some(value) = get("SIDECAR_DATA_DIR") {
            config.data_dir = PathBuf::from(value);
        }
        if let Some(value) = get("SIDECAR_HOST") {
            config.binding.host = value.trim().to_string();
        }
        if let Some(value) = get("SIDECAR_PORT") {
            config.binding.port = parse_number::<u16>("SIDECAR_PORT", &value)?;
            if config.binding.port == 0 {
                return Err(ExtensionError::Configuration(
                    "SIDECAR_PORT must be between 1 and 65535".to_string(),
                ));
            }
        }
        if let Some(value) = get("SIDECAR_URI_SCHEME") {
            config.binding.uri_scheme = value.trim().to_string();
        }
        if let Some(value) = get("SIDECAR_SERVICE_LABEL") {
            config.service_label = value;
        }
        if let Some(value) = get("SIDECAR_USERNAME_LENGTH") {
            let length = parse_number::<usize>("SIDECAR_USERNAME_LENGTH", &value)?;
            if !(1..=MAX_USERNAME_LEN).contains(&length) {
                return Err(ExtensionError::Configuration(format!(
                    "SIDECAR_USERNAME_LENGTH must be between 1 and {MAX_USERNAME_LEN}"
                )));
            }
            config.username_length = length;
        }
        if let Some(value) = get("SIDECAR_SECRET_BYTES") {
            let bytes = parse_number::<usize>("SIDECAR_SECRET_BYTES", &value)?;
            if bytes == 0 {
                return Err(ExtensionError::Configuration(
                    "SIDECAR_SECRET_BYTES must be positive".to_string(),
                ));
            }
            config.secret_bytes = bytes;
        }

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> ExtensionResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ExtensionError::Configuration(format!("{key} is not a valid number: {value:?}")))
}
