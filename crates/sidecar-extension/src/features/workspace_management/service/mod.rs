use crate::shared::error::ExtensionResult;
use sidecar_core::response::HTTP_OK;
use sidecar_core::{normalize_identifier, Response};
use sidecar_provisioners::Provisioner;
use std::sync::Arc;
use tracing::{info, Span};

/// Create, inspect and delete workspaces.
pub struct WorkspaceService {
    provisioner: Arc<dyn Provisioner>,
    span: Span,
}

impl WorkspaceService {
    pub fn new(provisioner: Arc<dyn Provisioner>, span: Span) -> Self {
        Self { provisioner, span }
    }

    pub fn create_workspace(&self, workspace_id: &str) -> ExtensionResult<Response> {
        let _entered = self.span.enter();
        info!(%workspace_id, "create-workspace");

        let name = normalize_identifier(workspace_id);
        self.provisioner.create_workspace(&name)?;

        info!(workspace = %name, "Workspace created successfully");
        Ok(Response::successful(HTTP_OK))
    }

    pub fn delete_workspace(&self, workspace_id: &str) -> ExtensionResult<Response> {
        let _entered = self.span.enter();
        info!(%workspace_id, "delete-workspace");

        let name = normalize_identifier(workspace_id);
        self.provisioner.delete_workspace(&name)?;

        info!(workspace = %name, "Workspace deleted successfully");
        Ok(Response::successful(HTTP_OK))
    }

    /// 200 when the workspace exists, 404 when it does not.
    pub fn get_workspace(&self, workspace_id: &str) -> ExtensionResult<Response> {
        let _entered = self.span.enter();
        info!(%workspace_id, "get-workspace");

        let name = normalize_identifier(workspace_id);
        let exists = self.provisioner.workspace_exists(&name)?;
        Ok(Response::found(exists))
    }
}
