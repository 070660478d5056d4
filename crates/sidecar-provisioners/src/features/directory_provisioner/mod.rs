pub mod repo;

use crate::{
    BindingAttributes, LazyConnection, Provisioner, ProvisionerKind, ProvisionerMetadata,
};
use repo::{UserRecord, WorkspaceStore};
use sidecar_core::Result;
use std::path::PathBuf;
use tracing::{info, Span};

/// Provisions workspaces as directories under a data root and users as
/// records inside them. The data root is opened on first use.
pub struct DirectoryProvisioner {
    connection: LazyConnection<WorkspaceStore>,
    metadata: ProvisionerMetadata,
    span: Span,
}

impl DirectoryProvisioner {
    pub fn new(provisioner_id: impl Into<String>, root: impl Into<PathBuf>, span: Span) -> Self {
        let root = root.into();
        Self {
            connection: LazyConnection::new(move || WorkspaceStore::open(root.clone())),
            metadata: ProvisionerMetadata::new(provisioner_id, ProvisionerKind::Directory),
            span,
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connection.connect_count()
    }
}

impl Provisioner for DirectoryProvisioner {
    fn create_workspace(&self, name: &str) -> Result<()> {
        let _entered = self.span.enter();
        let store = self.connection.get()?;
        let dir = store.create_workspace(name)?;
        info!(workspace = %name, path = %dir.display(), "workspace directory created");
        Ok(())
    }

    fn delete_workspace(&self, name: &str) -> Result<()> {
        let _entered = self.span.enter();
        self.connection.get()?.remove_workspace(name)?;
        info!(workspace = %name, "workspace directory removed");
        Ok(())
    }

    fn workspace_exists(&self, name: &str) -> Result<bool> {
        self.connection.get()?.workspace_exists(name)
    }

    fn create_user(
        &self,
        workspace: &str,
        username: &str,
        _password: &str,
    ) -> Result<BindingAttributes> {
        let _entered = self.span.enter();
        let store = self.connection.get()?;
        store.write_user(&UserRecord::new(workspace, username))?;
        info!(%workspace, %username, "user record written");

        let mut attributes = BindingAttributes::new();
        attributes.insert("database".to_string(), workspace.to_string());
        attributes.insert(
            "data_path".to_string(),
            store.workspace_dir(workspace)?.display().to_string(),
        );
        Ok(attributes)
    }

    fn delete_user(&self, workspace: &str, username: &str) -> Result<()> {
        let _entered = self.span.enter();
        self.connection.get()?.remove_user(workspace, username)?;
        info!(%workspace, %username, "user record removed");
        Ok(())
    }

    fn user_exists(&self, workspace: &str, username: &str) -> Result<bool> {
        self.connection.get()?.user_exists(workspace, username)
    }

    fn metadata(&self) -> ProvisionerMetadata {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidecar_core::CoreError;
    use tempfile::tempdir;

    #[test]
    fn test_directory_provisioner_lifecycle() {
        let dir = tempdir().unwrap();
        let provisioner = DirectoryProvisioner::new("dir", dir.path(), Span::none());

        provisioner.create_workspace("dws1").unwrap();
        assert!(provisioner.workspace_exists("dws1").unwrap());

        let attributes = provisioner.create_user("dws1", "u1", "pw").unwrap();
        assert_eq!(attributes["database"], "dws1");
        assert_eq!(
            attributes["data_path"],
            dir.path().join("dws1").display().to_string()
        );
        assert!(provisioner.user_exists("dws1", "u1").unwrap());

        provisioner.delete_user("dws1", "u1").unwrap();
        assert!(!provisioner.user_exists("dws1", "u1").unwrap());

        provisioner.delete_workspace("dws1").unwrap();
        assert!(!provisioner.workspace_exists("dws1").unwrap());
        assert_eq!(provisioner.connect_count(), 1);
    }

    #[test]
    fn test_password_is_not_persisted() {
        let dir = tempdir().unwrap();
        let provisioner = DirectoryProvisioner::new("dir", dir.path(), Span::none());
        provisioner.create_workspace("dws1").unwrap();
        provisioner
            .create_user("dws1", "u1", "super-secret-value")
            .unwrap();

        let record =
            std::fs::read_to_string(dir.path().join("dws1").join("users").join("u1.json"))
                .unwrap();
        assert!(!record.contains("super-secret-value"));
    }

    #[test]
    fn test_not_idempotent() {
        let dir = tempdir().unwrap();
        let provisioner = DirectoryProvisioner::new("dir", dir.path(), Span::none());
        provisioner.create_workspace("dws1").unwrap();

        let err = provisioner.create_workspace("dws1").unwrap_err();
        assert_eq!(
            err,
            CoreError::Provisioning("workspace dws1 already exists".to_string())
        );

        provisioner.create_user("dws1", "u1", "pw").unwrap();
        assert!(provisioner.create_user("dws1", "u1", "pw").is_err());
    }

    #[test]
    fn test_state_survives_new_provisioner() {
        let dir = tempdir().unwrap();
        DirectoryProvisioner::new("first", dir.path(), Span::none())
            .create_workspace("dws1")
            .unwrap();

        let second = DirectoryProvisioner::new("second", dir.path(), Span::none());
        assert!(second.workspace_exists("dws1").unwrap());
    }

    #[test]
    fn test_unusable_root_is_connection_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();

        let provisioner = DirectoryProvisioner::new("dir", &file, Span::none());
        assert!(matches!(
            provisioner.workspace_exists("dws1"),
            Err(CoreError::Connection(_))
        ));
    }
}
