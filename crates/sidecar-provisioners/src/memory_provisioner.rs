use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use sidecar_core::{CoreError, Result};
use tracing::{debug, Span};

use crate::{
    BindingAttributes, LazyConnection, Provisioner, ProvisionerKind, ProvisionerMetadata,
};

/// Workspace and user state kept in process memory. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    workspaces: Arc<RwLock<HashMap<String, HashSet<String>>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workspace_count(&self) -> usize {
        self.workspaces.read().map(|w| w.len()).unwrap_or(0)
    }

    fn poisoned() -> CoreError {
        CoreError::Provisioning("In-memory backend lock poisoned".to_string())
    }
}

/// Thread-safe provisioner backed by [`InMemoryBackend`].
pub struct InMemoryProvisioner {
    connection: LazyConnection<InMemoryBackend>,
    metadata: ProvisionerMetadata,
    span: Span,
}

impl InMemoryProvisioner {
    pub fn new(provisioner_id: impl Into<String>, span: Span) -> Self {
        Self::with_backend(provisioner_id, InMemoryBackend::new(), span)
    }

    /// Provision against an existing backend, e.g. one a test inspects.
    pub fn with_backend(
        provisioner_id: impl Into<String>,
        backend: InMemoryBackend,
        span: Span,
    ) -> Self {
        Self {
            connection: LazyConnection::new(move || Ok(backend.clone())),
            metadata: ProvisionerMetadata::new(provisioner_id, ProvisionerKind::Memory),
            span,
        }
    }

    /// A provisioner whose backend can never be reached.
    pub fn unreachable(provisioner_id: impl Into<String>, span: Span) -> Self {
        let provisioner_id = provisioner_id.into();
        let target = provisioner_id.clone();
        Self {
            connection: LazyConnection::new(move || {
                Err(CoreError::Connection(format!("{target} is unreachable")))
            }),
            metadata: ProvisionerMetadata::new(provisioner_id, ProvisionerKind::Memory),
            span,
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connection.connect_count()
    }
}

impl Provisioner for InMemoryProvisioner {
    fn create_workspace(&self, name: &str) -> Result<()> {
        let _entered = self.span.enter();
        let backend = self.connection.get()?;
        let mut workspaces = backend
            .workspaces
            .write()
            .map_err(|_| InMemoryBackend::poisoned())?;

        if workspaces.contains_key(name) {
            return Err(CoreError::Provisioning(format!(
                "workspace {name} already exists"
            )));
        }
        workspaces.insert(name.to_string(), HashSet::new());
        debug!(workspace = %name, "workspace created");
        Ok(())
    }

    fn delete_workspace(&self, name: &str) -> Result<()> {
        let _entered = self.span.enter();
        let backend = self.connection.get()?;
        let mut workspaces = backend
            .workspaces
            .write()
            .map_err(|_| InMemoryBackend::poisoned())?;

        if workspaces.remove(name).is_none() {
            return Err(CoreError::Provisioning(format!(
                "workspace {name} does not exist"
            )));
        }
        debug!(workspace = %name, "workspace deleted");
        Ok(())
    }

    fn workspace_exists(&self, name: &str) -> Result<bool> {
        let backend = self.connection.get()?;
        let workspaces = backend
            .workspaces
            .read()
            .map_err(|_| InMemoryBackend::poisoned())?;
        Ok(workspaces.contains_key(name))
    }

    fn create_user(
        &self,
        workspace: &str,
        username: &str,
        _password: &str,
    ) -> Result<BindingAttributes> {
        let _entered = self.span.enter();
        let backend = self.connection.get()?;
        let mut workspaces = backend
            .workspaces
            .write()
            .map_err(|_| InMemoryBackend::poisoned())?;

        let users = workspaces.get_mut(workspace).ok_or_else(|| {
            CoreError::Provisioning(format!("workspace {workspace} does not exist"))
        })?;
        if !users.insert(username.to_string()) {
            return Err(CoreError::Provisioning(format!(
                "user {username} already exists"
            )));
        }
        debug!(%workspace, %username, "user created");

        let mut attributes = BindingAttributes::new();
        attributes.insert("database".to_string(), workspace.to_string());
        Ok(attributes)
    }

    fn delete_user(&self, workspace: &str, username: &str) -> Result<()> {
        let _entered = self.span.enter();
        let backend = self.connection.get()?;
        let mut workspaces = backend
            .workspaces
            .write()
            .map_err(|_| InMemoryBackend::poisoned())?;

        let removed = workspaces
            .get_mut(workspace)
            .map(|users| users.remove(username))
            .unwrap_or(false);
        if !removed {
            return Err(CoreError::Provisioning(format!(
                "user {username} does not exist"
            )));
        }
        debug!(%workspace, %username, "user deleted");
        Ok(())
    }

    fn user_exists(&self, workspace: &str, username: &str) -> Result<bool> {
        let backend = self.connection.get()?;
        let workspaces = backend
            .workspaces
            .read()
            .map_err(|_| InMemoryBackend::poisoned())?;
        Ok(workspaces
            .get(workspace)
            .is_some_and(|users| users.contains(username)))
    }

    fn metadata(&self) -> ProvisionerMetadata {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provisioner() -> InMemoryProvisioner {
        InMemoryProvisioner::new("test-memory", Span::none())
    }

    #[test]
    fn test_workspace_lifecycle() {
        let provisioner = create_test_provisioner();

        assert!(!provisioner.workspace_exists("dws1").unwrap());
        provisioner.create_workspace("dws1").unwrap();
        assert!(provisioner.workspace_exists("dws1").unwrap());
        provisioner.delete_workspace("dws1").unwrap();
        assert!(!provisioner.workspace_exists("dws1").unwrap());
    }

    #[test]
    fn test_duplicate_workspace_is_rejected() {
        let provisioner = create_test_provisioner();
        provisioner.create_workspace("dws1").unwrap();

        let err = provisioner.create_workspace("dws1").unwrap_err();
        assert_eq!(
            err,
            CoreError::Provisioning("workspace dws1 already exists".to_string())
        );
    }

    #[test]
    fn test_delete_missing_workspace_is_rejected() {
        let provisioner = create_test_provisioner();
        assert!(matches!(
            provisioner.delete_workspace("dnope"),
            Err(CoreError::Provisioning(_))
        ));
    }

    #[test]
    fn test_user_lifecycle() {
        let provisioner = create_test_provisioner();
        provisioner.create_workspace("dws1").unwrap();

        let attributes = provisioner.create_user("dws1", "alice", "secret").unwrap();
        assert_eq!(attributes.get("database").map(String::as_str), Some("dws1"));
        assert!(provisioner.user_exists("dws1", "alice").unwrap());
        assert!(!provisioner.user_exists("dws2", "alice").unwrap());

        provisioner.delete_user("dws1", "alice").unwrap();
        assert!(!provisioner.user_exists("dws1", "alice").unwrap());
        assert!(provisioner.delete_user("dws1", "alice").is_err());
    }

    #[test]
    fn test_create_user_requires_workspace() {
        let provisioner = create_test_provisioner();
        let err = provisioner.create_user("dmissing", "alice", "pw").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_connection_is_established_once() {
        let provisioner = create_test_provisioner();
        assert_eq!(provisioner.connect_count(), 0);

        provisioner.create_workspace("dws1").unwrap();
        provisioner.workspace_exists("dws1").unwrap();
        provisioner.create_user("dws1", "bob", "pw").unwrap();

        assert_eq!(provisioner.connect_count(), 1);
    }

    #[test]
    fn test_shared_backend_is_visible_across_provisioners() {
        let backend = InMemoryBackend::new();
        let first = InMemoryProvisioner::with_backend("a", backend.clone(), Span::none());
        let second = InMemoryProvisioner::with_backend("b", backend.clone(), Span::none());

        first.create_workspace("dshared").unwrap();
        assert!(second.workspace_exists("dshared").unwrap());
        assert_eq!(backend.workspace_count(), 1);
    }

    #[test]
    fn test_unreachable_backend_surfaces_connection_error() {
        let provisioner = InMemoryProvisioner::unreachable("offline", Span::none());
        let err = provisioner.create_workspace("dws1").unwrap_err();
        assert_eq!(
            err,
            CoreError::Connection("offline is unreachable".to_string())
        );
    }

    #[test]
    fn test_metadata() {
        let metadata = create_test_provisioner().metadata();
        assert_eq!(metadata.provisioner_id, "test-memory");
        assert_eq!(metadata.kind, ProvisionerKind::Memory);
    }
}
