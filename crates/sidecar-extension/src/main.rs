use sidecar_core::response::{DEFAULT_PROCESSING_TYPE, RESPONSE_SCHEMA_VERSION};
use sidecar_extension::backend::build_provisioner;
use sidecar_extension::cli::{parse_invocation, Invocation};
use sidecar_extension::config::ExtensionConfig;
use sidecar_extension::features::invocation::controller::{InvocationController, Outcome};
use sidecar_extension::features::response_channel::repo::FileResponseSink;
use sidecar_extension::features::response_channel::service::ResponseChannelService;
use sidecar_extension::shared::error::ExtensionResult;
use sidecar_extension::{logging, ProvisioningExtension};
use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, info_span, warn};

fn main() -> ExitCode {
    tracing::subscriber::with_default(logging::build_subscriber(), || {
        run(std::env::args_os().collect())
    })
}

fn run(args: Vec<OsString>) -> ExitCode {
    let (operation, request) = match parse_invocation(args) {
        Ok(Invocation::Run { operation, request }) => (operation, request),
        Ok(Invocation::Help(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let span = info_span!("invocation", %operation, workspace_id = %request.workspace_id());
    let sink = Arc::new(FileResponseSink::new(request.output_path()));

    let config = match ExtensionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Invalid configuration");
            let channel =
                ResponseChannelService::new(sink, DEFAULT_PROCESSING_TYPE, span.clone());
            return exit_code(channel.deliver_error(&e).map(|_| Outcome::Failed));
        }
    };

    let provisioner = build_provisioner(&config, span.clone());
    let metadata = provisioner.metadata();
    info!(
        provisioner_id = %metadata.provisioner_id,
        kind = ?metadata.kind,
        version = %metadata.version,
        schema = RESPONSE_SCHEMA_VERSION,
        "Starting sidecar extension"
    );

    let extension = Arc::new(ProvisioningExtension::new(provisioner, &config, span.clone()));
    let channel = ResponseChannelService::new(sink, config.service_label.clone(), span.clone());
    let controller = InvocationController::new(extension, channel, span);

    exit_code(controller.handle(operation, &request))
}

fn exit_code(result: ExtensionResult<Outcome>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "No response could be delivered");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
