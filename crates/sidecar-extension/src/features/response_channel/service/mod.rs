use crate::features::response_channel::repo::ResponseSink;
use crate::shared::error::{ExtensionError, ExtensionResult};
use sidecar_core::Response;
use std::sync::Arc;
use tracing::{debug, Span};

/// Stamps responses with the configured service label and hands them to the sink.
pub struct ResponseChannelService {
    sink: Arc<dyn ResponseSink>,
    processing_type: String,
    span: Span,
}

impl ResponseChannelService {
    pub fn new(sink: Arc<dyn ResponseSink>, processing_type: impl Into<String>, span: Span) -> Self {
        Self {
            sink,
            processing_type: processing_type.into(),
            span,
        }
    }

    pub fn deliver(&self, response: Response) -> ExtensionResult<()> {
        let _entered = self.span.enter();
        let response = response.with_processing_type(self.processing_type.clone());
        debug!(
            location = %self.sink.location(),
            http_code = response.http_code,
            status = ?response.status,
            "writing response"
        );
        self.sink.write(&response)?;
        Ok(())
    }

    /// Deliver a failure response whose details are the error's text.
    pub fn deliver_error(&self, error: &ExtensionError) -> ExtensionResult<()> {
        self.deliver(Response::from(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::response_channel::repo::InMemoryResponseSink;
    use serde_json::json;
    use sidecar_core::response::HTTP_NOT_FOUND;
    use sidecar_core::Status;

    fn create_test_service(sink: &InMemoryResponseSink) -> ResponseChannelService {
        ResponseChannelService::new(Arc::new(sink.clone()), "mysql", Span::none())
    }

    #[test]
    fn test_deliver_applies_service_label() {
        let sink = InMemoryResponseSink::new();
        create_test_service(&sink)
            .deliver(Response::found(false))
            .unwrap();

        let responses = sink.responses();
        assert_eq!(responses[0].processing_type, "mysql");
        assert_eq!(responses[0].http_code, HTTP_NOT_FOUND);
    }

    #[test]
    fn test_deliver_error_uses_error_text() {
        let sink = InMemoryResponseSink::new();
        let error = ExtensionError::Provisioning("database d1 already exists".to_string());
        create_test_service(&sink).deliver_error(&error).unwrap();

        let response = &sink.responses()[0];
        assert_eq!(response.status, Status::Failed);
        assert_eq!(response.details, json!(error.to_string()));
    }
}
