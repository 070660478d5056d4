use serde::{Deserialize, Serialize};
use sidecar_provisioners::BindingAttributes;
use std::collections::BTreeMap;
use std::fmt;

pub use sidecar_core::{Request, Response, Status};

/// The six operations an invocation can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    CreateWorkspace,
    GetWorkspace,
    DeleteWorkspace,
    CreateConnection,
    GetConnection,
    DeleteConnection,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateWorkspace => "create-workspace",
            Operation::GetWorkspace => "get-workspace",
            Operation::DeleteWorkspace => "delete-workspace",
            Operation::CreateConnection => "create-connection",
            Operation::GetConnection => "get-connection",
            Operation::DeleteConnection => "delete-connection",
        }
    }

    pub fn requires_connection(&self) -> bool {
        matches!(
            self,
            Operation::CreateConnection | Operation::GetConnection | Operation::DeleteConnection
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection parameters advertised to the caller in every binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConfig {
    pub host: String,
    pub port: u16,
    pub uri_scheme: String,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            uri_scheme: "postgres".to_string(),
        }
    }
}

/// Credentials handed to the caller after a successful connection creation.
/// Never persisted here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub hostname: String,
    pub host: String,
    pub port: String,
    pub username: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub uri: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

const RESERVED_KEYS: [&str; 5] = ["hostname", "username", "user", "password", "uri"];

impl Binding {
    /// Merge provisioner attributes over the configured parameters.
    ///
    /// `host`, `port` and `database` returned by the provisioner win over the
    /// configuration. Attributes colliding with the credential fields are
    /// dropped; anything else is carried through as-is.
    pub fn assemble(
        config: &BindingConfig,
        username: &str,
        password: &str,
        mut attributes: BindingAttributes,
    ) -> Self {
        let host = attributes
            .remove("host")
            .unwrap_or_else(|| config.host.clone());
        let port = attributes
            .remove("port")
            .unwrap_or_else(|| config.port.to_string());
        let database = attributes.remove("database").unwrap_or_default();
        for key in RESERVED_KEYS {
            attributes.remove(key);
        }

        let uri = format!(
            "{}://{}:{}@{}:{}/{}",
            config.uri_scheme, username, password, host, port, database
        );

        Self {
            hostname: host.clone(),
            host,
            port,
            username: username.to_string(),
            user: username.to_string(),
            password: password.to_string(),
            database,
            uri,
            extra: attributes,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("extra", &self.extra)
            .finish()
    }
}
