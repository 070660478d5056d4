use crate::shared::error::ExtensionResult;
use crate::shared::types::{Binding, BindingConfig};
use sidecar_core::credentials::DEFAULT_SECRET_BYTES;
use sidecar_core::identity::DEFAULT_USERNAME_LEN;
use sidecar_core::response::HTTP_OK;
use sidecar_core::{derive_username, generate_secret, normalize_identifier, Response};
use sidecar_provisioners::Provisioner;
use std::sync::Arc;
use tracing::{info, Span};

/// Create, inspect and delete per-tenant credentials on a workspace.
pub struct ConnectionService {
    provisioner: Arc<dyn Provisioner>,
    binding: BindingConfig,
    username_length: usize,
    secret_bytes: usize,
    span: Span,
}

impl ConnectionService {
    pub fn new(provisioner: Arc<dyn Provisioner>, binding: BindingConfig, span: Span) -> Self {
        Self {
            provisioner,
            binding,
            username_length: DEFAULT_USERNAME_LEN,
            secret_bytes: DEFAULT_SECRET_BYTES,
            span,
        }
    }

    pub fn with_username_length(mut self, username_length: usize) -> Self {
        self.username_length = username_length;
        self
    }

    pub fn with_secret_bytes(mut self, secret_bytes: usize) -> Self {
        self.secret_bytes = secret_bytes;
        self
    }

    /// Create a user with a fresh password and return its binding.
    ///
    /// Nothing is rolled back if the provisioner fails part-way.
    pub fn create_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
    ) -> ExtensionResult<Response> {
        let _entered = self.span.enter();
        info!(%workspace_id, %connection_id, "create-connection");

        let workspace = normalize_identifier(workspace_id);
        let username = derive_username(connection_id, self.username_length);
        let password = generate_secret(self.secret_bytes)?;

        let attributes = self
            .provisioner
            .create_user(&workspace, &username, &password)?;

        let binding = Binding::assemble(&self.binding, &username, &password, attributes);
        info!(%workspace, %username, "Connection created successfully");

        Ok(Response::with_payload(HTTP_OK, &binding)?)
    }

    pub fn delete_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
    ) -> ExtensionResult<Response> {
        let _entered = self.span.enter();
        info!(%workspace_id, %connection_id, "delete-connection");

        let workspace = normalize_identifier(workspace_id);
        let username = derive_username(connection_id, self.username_length);
        self.provisioner.delete_user(&workspace, &username)?;

        info!(%workspace, %username, "Connection deleted successfully");
        Ok(Response::successful(HTTP_OK))
    }

    /// 200 when the derived user exists, 404 when it does not.
    pub fn get_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
    ) -> ExtensionResult<Response> {
        let _entered = self.span.enter();
        info!(%workspace_id, %connection_id, "get-connection");

        let workspace = normalize_identifier(workspace_id);
        let username = derive_username(connection_id, self.username_length);
        let exists = self.provisioner.user_exists(&workspace, &username)?;
        Ok(Response::found(exists))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::ExtensionError;
    use sidecar_core::response::HTTP_NOT_FOUND;
    use sidecar_core::{CoreError, Status};
    use sidecar_provisioners::{
        BindingAttributes, InMemoryProvisioner, ProvisionerKind, ProvisionerMetadata,
    };

    const WORKSPACE_ID: &str = "905ab3af-b149-46b6-bc6e-75073c703e19";
    const CONNECTION_ID: &str = "c0232d8b-2cbe-4c5c-b7ee-9024c6ee0006";

    /// Workspace calls succeed, user creation is refused.
    struct RejectingProvisioner;

    impl Provisioner for RejectingProvisioner {
        fn create_workspace(&self, _name: &str) -> sidecar_core::Result<()> {
            Ok(())
        }

        fn delete_workspace(&self, _name: &str) -> sidecar_core::Result<()> {
            Ok(())
        }

        fn workspace_exists(&self, _name: &str) -> sidecar_core::Result<bool> {
            Ok(true)
        }

        fn create_user(
            &self,
            _workspace: &str,
            _username: &str,
            _password: &str,
        ) -> sidecar_core::Result<BindingAttributes> {
            Err(CoreError::Provisioning("permission denied".to_string()))
        }

        fn delete_user(&self, _workspace: &str, _username: &str) -> sidecar_core::Result<()> {
            Ok(())
        }

        fn user_exists(&self, _workspace: &str, _username: &str) -> sidecar_core::Result<bool> {
            Ok(false)
        }

        fn metadata(&self) -> ProvisionerMetadata {
            ProvisionerMetadata::new("rejecting", ProvisionerKind::Memory)
        }
    }

    fn binding_config() -> BindingConfig {
        BindingConfig {
            host: "db.example.internal".to_string(),
            port: 5433,
            uri_scheme: "postgres".to_string(),
        }
    }

    fn create_test_service() -> (ConnectionService, Arc<InMemoryProvisioner>) {
        let provisioner = Arc::new(InMemoryProvisioner::new("test-memory", Span::none()));
        provisioner
            .create_workspace(&normalize_identifier(WORKSPACE_ID))
            .unwrap();
        let service = ConnectionService::new(provisioner.clone(), binding_config(), Span::none());
        (service, provisioner)
    }

    #[test]
    fn test_create_connection_returns_binding() {
        let (service, _provisioner) = create_test_service();

        let response = service
            .create_connection(WORKSPACE_ID, CONNECTION_ID)
            .unwrap();
        assert_eq!(response.http_code, HTTP_OK);
        assert_eq!(response.status, Status::Successful);

        let binding: Binding = serde_json::from_value(response.details).unwrap();
        let username = derive_username(CONNECTION_ID, 16);
        assert_eq!(binding.host, "db.example.internal");
        assert_eq!(binding.port, "5433");
        assert_eq!(binding.username, username);
        assert_eq!(binding.user, username);
        assert_eq!(binding.database, normalize_identifier(WORKSPACE_ID));
        assert_eq!(binding.password.len(), 43);
        assert_eq!(
            binding.uri,
            format!(
                "postgres://{}:{}@db.example.internal:5433/{}",
                username,
                binding.password,
                normalize_identifier(WORKSPACE_ID)
            )
        );
    }

    #[test]
    fn test_create_connection_generates_fresh_passwords() {
        let (service, _provisioner) = create_test_service();
        let first = service
            .create_connection(WORKSPACE_ID, "connection-a")
            .unwrap();
        let second = service
            .create_connection(WORKSPACE_ID, "connection-b")
            .unwrap();
        assert_ne!(first.details["password"], second.details["password"]);
    }

    #[test]
    fn test_create_connection_failure_returns_no_binding() {
        let service =
            ConnectionService::new(Arc::new(RejectingProvisioner), binding_config(), Span::none());

        let result = service.create_connection(WORKSPACE_ID, CONNECTION_ID);
        assert_eq!(
            result.unwrap_err(),
            ExtensionError::Provisioning("permission denied".to_string())
        );
    }

    #[test]
    fn test_create_connection_in_missing_workspace_fails() {
        let provisioner = Arc::new(InMemoryProvisioner::new("empty", Span::none()));
        let service = ConnectionService::new(provisioner, binding_config(), Span::none());

        assert!(matches!(
            service.create_connection(WORKSPACE_ID, CONNECTION_ID),
            Err(ExtensionError::Provisioning(_))
        ));
    }

    #[test]
    fn test_get_and_delete_connection() {
        let (service, _provisioner) = create_test_service();

        assert_eq!(
            service
                .get_connection(WORKSPACE_ID, CONNECTION_ID)
                .unwrap()
                .http_code,
            HTTP_NOT_FOUND
        );

        service
            .create_connection(WORKSPACE_ID, CONNECTION_ID)
            .unwrap();
        assert_eq!(
            service
                .get_connection(WORKSPACE_ID, CONNECTION_ID)
                .unwrap()
                .http_code,
            HTTP_OK
        );

        service
            .delete_connection(WORKSPACE_ID, CONNECTION_ID)
            .unwrap();
        assert_eq!(
            service
                .get_connection(WORKSPACE_ID, CONNECTION_ID)
                .unwrap()
                .http_code,
            HTTP_NOT_FOUND
        );
    }

    #[test]
    fn test_custom_username_length_and_secret_size() {
        let (service, _provisioner) = create_test_service();
        let service = service.with_username_length(8).with_secret_bytes(12);

        let response = service
            .create_connection(WORKSPACE_ID, CONNECTION_ID)
            .unwrap();
        assert_eq!(
            response.details["username"],
            derive_username(CONNECTION_ID, 8)
        );
        assert_eq!(response.details["password"].as_str().unwrap().len(), 16);
    }

    #[test]
    fn test_zero_secret_bytes_fails_before_provisioning() {
        let (service, provisioner) = create_test_service();
        let service = service.with_secret_bytes(0);

        assert!(matches!(
            service.create_connection(WORKSPACE_ID, CONNECTION_ID),
            Err(ExtensionError::Argument(_))
        ));
        let username = derive_username(CONNECTION_ID, 16);
        assert!(!provisioner
            .user_exists(&normalize_identifier(WORKSPACE_ID), &username)
            .unwrap());
    }
}
