pub mod connection_management;
pub mod invocation;
pub mod response_channel;
pub mod workspace_management;
