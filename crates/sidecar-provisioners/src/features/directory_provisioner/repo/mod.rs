use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sidecar_core::{CoreError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

const USERS_DIR: &str = "users";

/// Record left on disk for each provisioned user. Passwords are not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub workspace: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(workspace: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            workspace: workspace.into(),
            created_at: Utc::now(),
        }
    }
}

/// Filesystem layout: `<root>/<workspace>/users/<username>.json`.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    root: PathBuf,
}

impl WorkspaceStore {
    /// Open the store, creating `root` if it does not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            CoreError::Connection(format!(
                "cannot open data directory {}: {e}",
                root.display()
            ))
        })?;
        if !root.is_dir() {
            return Err(CoreError::Connection(format!(
                "data directory {} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workspace_dir(&self, workspace: &str) -> Result<PathBuf> {
        Ok(self.root.join(single_component(workspace, "workspace")?))
    }

    fn user_file(&self, workspace: &str, username: &str) -> Result<PathBuf> {
        let file = format!("{}.json", single_component(username, "username")?);
        Ok(self.workspace_dir(workspace)?.join(USERS_DIR).join(file))
    }

    pub fn workspace_exists(&self, workspace: &str) -> Result<bool> {
        Ok(self.workspace_dir(workspace)?.is_dir())
    }

    /// Create the workspace directory. Fails if it already exists.
    pub fn create_workspace(&self, workspace: &str) -> Result<PathBuf> {
        let dir = self.workspace_dir(workspace)?;
        fs::create_dir(&dir).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => {
                CoreError::Provisioning(format!("workspace {workspace} already exists"))
            }
            _ => CoreError::Provisioning(format!("cannot create workspace {workspace}: {e}")),
        })?;
        fs::create_dir(dir.join(USERS_DIR))?;
        Ok(dir)
    }

    /// Remove the workspace directory together with its users.
    pub fn remove_workspace(&self, workspace: &str) -> Result<()> {
        let dir = self.workspace_dir(workspace)?;
        fs::remove_dir_all(&dir).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                CoreError::Provisioning(format!("workspace {workspace} does not exist"))
            }
            _ => CoreError::Provisioning(format!("cannot delete workspace {workspace}: {e}")),
        })
    }

    pub fn user_exists(&self, workspace: &str, username: &str) -> Result<bool> {
        Ok(self.user_file(workspace, username)?.is_file())
    }

    /// Persist a user record. Fails if the workspace is missing or the user exists.
    pub fn write_user(&self, record: &UserRecord) -> Result<PathBuf> {
        if !self.workspace_exists(&record.workspace)? {
            return Err(CoreError::Provisioning(format!(
                "workspace {} does not exist",
                record.workspace
            )));
        }

        let path = self.user_file(&record.workspace, &record.username)?;
        let bytes = serde_json::to_vec_pretty(record)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    CoreError::Provisioning(format!("user {} already exists", record.username))
                }
                _ => CoreError::Provisioning(format!(
                    "cannot create user {}: {e}",
                    record.username
                )),
            })?;
        std::io::Write::write_all(&mut file, &bytes)?;
        Ok(path)
    }

    pub fn read_user(&self, workspace: &str, username: &str) -> Result<Option<UserRecord>> {
        let path = self.user_file(workspace, username)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn remove_user(&self, workspace: &str, username: &str) -> Result<()> {
        let path = self.user_file(workspace, username)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                CoreError::Provisioning(format!("user {username} does not exist"))
            }
            _ => CoreError::Provisioning(format!("cannot delete user {username}: {e}")),
        })
    }
}

/// Reject names that would resolve outside their parent directory.
fn single_component<'a>(name: &'a str, what: &str) -> Result<&'a str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains('\\') => Ok(name),
        _ => Err(CoreError::Provisioning(format!("invalid {what} name: {name}"))),
    }
}
