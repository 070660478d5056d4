use crate::config::{BackendKind, ExtensionConfig};
use sidecar_provisioners::{DirectoryProvisioner, InMemoryProvisioner, Provisioner};
use std::sync::Arc;
use tracing::Span;

/// Select the provisioner named by the configuration. Neither backend
/// connects until its first operation.
pub fn build_provisioner(config: &ExtensionConfig, span: Span) -> Arc<dyn Provisioner> {
    match config.backend {
        BackendKind::Memory => Arc::new(InMemoryProvisioner::new("memory", span)),
        BackendKind::Directory => Arc::new(DirectoryProvisioner::new(
            "directory",
            config.data_dir.clone(),
            span,
        )),
    }
}
