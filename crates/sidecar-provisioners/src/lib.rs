pub mod features;
pub mod lazy;
pub mod memory_provisioner;

use serde::{Deserialize, Serialize};
use sidecar_core::Result;
use std::collections::BTreeMap;

pub use features::directory_provisioner::DirectoryProvisioner;
pub use lazy::LazyConnection;
pub use memory_provisioner::{InMemoryBackend, InMemoryProvisioner};

/// Connection attributes returned by a successful `create_user`.
pub type BindingAttributes = BTreeMap<String, String>;

/// Backend-specific workspace and user lifecycle.
///
/// Implementations connect on first use and keep that connection for the rest
/// of the process. They surface backend errors as-is: no retries, no "already
/// exists" suppression. Idempotency is the caller's concern.
pub trait Provisioner: Send + Sync {
    fn create_workspace(&self, name: &str) -> Result<()>;
    fn delete_workspace(&self, name: &str) -> Result<()>;
    fn workspace_exists(&self, name: &str) -> Result<bool>;
    fn create_user(
        &self,
        workspace: &str,
        username: &str,
        password: &str,
    ) -> Result<BindingAttributes>;
    fn delete_user(&self, workspace: &str, username: &str) -> Result<()>;
    fn user_exists(&self, workspace: &str, username: &str) -> Result<bool>;
    fn metadata(&self) -> ProvisionerMetadata;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionerKind {
    Memory,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionerMetadata {
    pub provisioner_id: String,
    pub kind: ProvisionerKind,
    pub version: String,
}

impl ProvisionerMetadata {
    pub fn new(provisioner_id: impl Into<String>, kind: ProvisionerKind) -> Self {
        Self {
            provisioner_id: provisioner_id.into(),
            kind,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
