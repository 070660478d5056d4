use crate::features::response_channel::service::ResponseChannelService;
use crate::shared::error::ExtensionResult;
use crate::shared::types::{Operation, Request, Response};
use crate::Extension;
use std::sync::Arc;
use tracing::{info, warn, Span};

/// How an invocation ended once its response was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Routes one request to the extension and delivers exactly one response.
pub struct InvocationController {
    extension: Arc<dyn Extension>,
    channel: ResponseChannelService,
    span: Span,
}

impl InvocationController {
    pub fn new(extension: Arc<dyn Extension>, channel: ResponseChannelService, span: Span) -> Self {
        Self {
            extension,
            channel,
            span,
        }
    }

    pub fn dispatch(&self, operation: Operation, request: &Request) -> ExtensionResult<Response> {
        let workspace_id = request.workspace_id();
        match operation {
            Operation::CreateWorkspace => self.extension.create_workspace(workspace_id),
            Operation::GetWorkspace => self.extension.get_workspace(workspace_id),
            Operation::DeleteWorkspace => self.extension.delete_workspace(workspace_id),
            Operation::CreateConnection => self
                .extension
                .create_connection(workspace_id, request.require_connection_id()?),
            Operation::GetConnection => self
                .extension
                .get_connection(workspace_id, request.require_connection_id()?),
            Operation::DeleteConnection => self
                .extension
                .delete_connection(workspace_id, request.require_connection_id()?),
        }
    }

    /// Run the operation and write its response, or a failure response in
    /// its place. `Err` means nothing could be delivered.
    pub fn handle(&self, operation: Operation, request: &Request) -> ExtensionResult<Outcome> {
        let span = self.span.clone();
        let _entered = span.enter();
        info!(%operation, output = %request.output_path().display(), "Handling invocation");

        match self.dispatch(operation, request) {
            Ok(response) => {
                self.channel.deliver(response)?;
                Ok(Outcome::Succeeded)
            }
            Err(e) => {
                warn!(%operation, error = %e, "Operation failed");
                self.channel.deliver_error(&e)?;
                Ok(Outcome::Failed)
            }
        }
    }
}
