pub mod backend;
pub mod cli;
pub mod config;
pub mod features;
pub mod logging;
pub mod shared;

use crate::config::ExtensionConfig;
use crate::features::connection_management::service::ConnectionService;
use crate::features::workspace_management::service::WorkspaceService;
use crate::shared::error::ExtensionResult;
use sidecar_core::Response;
use sidecar_provisioners::Provisioner;
use std::sync::Arc;
use tracing::Span;

pub use shared::error::ExtensionError;
pub use shared::types::{Binding, BindingConfig, Operation};

/// The six operations a provisioning sidecar exposes. Each returns the
/// response to deliver, or the error to report in its place.
pub trait Extension: Send + Sync {
    fn create_workspace(&self, workspace_id: &str) -> ExtensionResult<Response>;
    fn get_workspace(&self, workspace_id: &str) -> ExtensionResult<Response>;
    fn delete_workspace(&self, workspace_id: &str) -> ExtensionResult<Response>;
    fn create_connection(&self, workspace_id: &str, connection_id: &str)
        -> ExtensionResult<Response>;
    fn get_connection(&self, workspace_id: &str, connection_id: &str) -> ExtensionResult<Response>;
    fn delete_connection(&self, workspace_id: &str, connection_id: &str)
        -> ExtensionResult<Response>;
}

/// Workspace and connection management over a single provisioner.
pub struct ProvisioningExtension {
    workspaces: WorkspaceService,
    connections: ConnectionService,
}

impl ProvisioningExtension {
    pub fn new(provisioner: Arc<dyn Provisioner>, config: &ExtensionConfig, span: Span) -> Self {
        let workspaces = WorkspaceService::new(provisioner.clone(), span.clone());
        let connections = ConnectionService::new(provisioner, config.binding.clone(), span)
            .with_username_length(config.username_length)
            .with_secret_bytes(config.secret_bytes);
        Self {
            workspaces,
            connections,
        }
    }
}

impl Extension for ProvisioningExtension {
    fn create_workspace(&self, workspace_id: &str) -> ExtensionResult<Response> {
        self.workspaces.create_workspace(workspace_id)
    }

    fn get_workspace(&self, workspace_id: &str) -> ExtensionResult<Response> {
        self.workspaces.get_workspace(workspace_id)
    }

    fn delete_workspace(&self, workspace_id: &str) -> ExtensionResult<Response> {
        self.workspaces.delete_workspace(workspace_id)
    }

    fn create_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
    ) -> ExtensionResult<Response> {
        self.connections
            .create_connection(workspace_id, connection_id)
    }

    fn get_connection(&self, workspace_id: &str, connection_id: &str) -> ExtensionResult<Response> {
        self.connections.get_connection(workspace_id, connection_id)
    }

    fn delete_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
    ) -> ExtensionResult<Response> {
        self.connections
            .delete_connection(workspace_id, connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidecar_core::response::{HTTP_NOT_FOUND, HTTP_OK};
    use sidecar_provisioners::InMemoryProvisioner;

    const WORKSPACE_ID: &str = "905ab3af-b149-46b6-bc6e-75073c703e19";
    const CONNECTION_ID: &str = "c0232d8b-2cbe-4c5c-b7ee-9024c6ee0006";

    fn create_test_extension(config: &ExtensionConfig) -> ProvisioningExtension {
        let provisioner = Arc::new(InMemoryProvisioner::new("test-memory", Span::none()));
        ProvisioningExtension::new(provisioner, config, Span::none())
    }

    #[test]
    fn test_full_lifecycle() {
        let extension = create_test_extension(&ExtensionConfig::default());

        extension.create_workspace(WORKSPACE_ID).unwrap();
        extension
            .create_connection(WORKSPACE_ID, CONNECTION_ID)
            .unwrap();
        assert_eq!(
            extension
                .get_connection(WORKSPACE_ID, CONNECTION_ID)
                .unwrap()
                .http_code,
            HTTP_OK
        );

        extension
            .delete_connection(WORKSPACE_ID, CONNECTION_ID)
            .unwrap();
        extension.delete_workspace(WORKSPACE_ID).unwrap();
        assert_eq!(
            extension.get_workspace(WORKSPACE_ID).unwrap().http_code,
            HTTP_NOT_FOUND
        );
    }

    #[test]
    fn test_config_flows_into_bindings() {
        let mut config = ExtensionConfig::default();
        config.binding.host = "db.internal".to_string();
        config.binding.port = 3306;
        config.binding.uri_scheme = "mysql".to_string();
        config.username_length = 10;
        let extension = create_test_extension(&config);

        extension.create_workspace(WORKSPACE_ID).unwrap();
        let response = extension
            .create_connection(WORKSPACE_ID, CONNECTION_ID)
            .unwrap();

        let username = sidecar_core::derive_username(CONNECTION_ID, 10);
        assert_eq!(response.details["host"], "db.internal");
        assert_eq!(response.details["port"], "3306");
        assert_eq!(response.details["username"], username.as_str());
        assert!(response.details["uri"]
            .as_str()
            .unwrap()
            .starts_with(&format!("mysql://{username}:")));
    }
}
