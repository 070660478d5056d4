use crate::shared::error::{ExtensionError, ExtensionResult};
use crate::shared::types::{Operation, Request};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;

#[derive(Debug, Parser)]
#[command(
    name = "sidecar-extension",
    version,
    about = "Provision workspaces and connections, writing one JSON response per invocation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: OperationCommand,
}

#[derive(Debug, Subcommand)]
pub enum OperationCommand {
    /// Create a workspace
    CreateWorkspace(RequestArgs),
    /// Check whether a workspace exists
    GetWorkspace(RequestArgs),
    /// Delete a workspace
    DeleteWorkspace(RequestArgs),
    /// Create a connection and return its credentials
    CreateConnection(RequestArgs),
    /// Check whether a connection exists
    GetConnection(RequestArgs),
    /// Delete a connection
    DeleteConnection(RequestArgs),
}

impl OperationCommand {
    fn into_parts(self) -> (Operation, RequestArgs) {
        match self {
            OperationCommand::CreateWorkspace(args) => (Operation::CreateWorkspace, args),
            OperationCommand::GetWorkspace(args) => (Operation::GetWorkspace, args),
            OperationCommand::DeleteWorkspace(args) => (Operation::DeleteWorkspace, args),
            OperationCommand::CreateConnection(args) => (Operation::CreateConnection, args),
            OperationCommand::GetConnection(args) => (Operation::GetConnection, args),
            OperationCommand::DeleteConnection(args) => (Operation::DeleteConnection, args),
        }
    }
}

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// File the JSON response is appended to
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Workspace identifier
    #[arg(short = 'w', long = "workspace")]
    pub workspace: Option<String>,

    /// Connection identifier
    #[arg(short = 'c', long = "connection")]
    pub connection: Option<String>,

    /// OUTPUT WORKSPACE [CONNECTION], when not given as flags
    #[arg(value_name = "VALUES", num_args = 0..=3)]
    pub positional: Vec<String>,
}

impl RequestArgs {
    fn into_request(self) -> ExtensionResult<Request> {
        let mut positional = self.positional.into_iter();
        let output = self.output.or(positional.next());
        let workspace = self.workspace.or(positional.next());
        let connection = self.connection.or(positional.next());
        Ok(Request::from_parts(output, workspace, connection)?)
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run {
        operation: Operation,
        request: Request,
    },
    /// Usage or version text to print; nothing else happens.
    Help(String),
}

pub fn parse_invocation<I, T>(args: I) -> ExtensionResult<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    Ok(Invocation::Help(e.render().to_string()))
                }
                _ => Err(ExtensionError::Argument(
                    e.render().to_string().trim_end().to_string(),
                )),
            };
        }
    };

    let (operation, args) = cli.command.into_parts();
    let request = args.into_request()?;
    if operation.requires_connection() {
        request.require_connection_id()?;
    }
    Ok(Invocation::Run { operation, request })
}
