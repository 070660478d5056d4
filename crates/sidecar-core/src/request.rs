use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One invocation's input: which workspace (and optionally which connection)
/// to act on, and where the response goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    workspace_id: String,
    connection_id: Option<String>,
    output_path: PathBuf,
}

impl Request {
    /// Validate raw argument values. Blank values count as missing.
    pub fn from_parts(
        output_path: Option<String>,
        workspace_id: Option<String>,
        connection_id: Option<String>,
    ) -> Result<Self> {
        let output_path = non_blank(output_path)
            .ok_or_else(|| CoreError::Argument("No output path was passed".to_string()))?;
        let workspace_id = non_blank(workspace_id)
            .ok_or_else(|| CoreError::Argument("No workspace was passed".to_string()))?;

        Ok(Self {
            workspace_id,
            connection_id: non_blank(connection_id),
            output_path: PathBuf::from(output_path),
        })
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    /// The connection ID, required by the connection operations.
    pub fn require_connection_id(&self) -> Result<&str> {
        self.connection_id()
            .ok_or_else(|| CoreError::Argument("No connection was passed".to_string()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
