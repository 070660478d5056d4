use sidecar_core::{CoreError, Response, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

type Encoder = fn(&Response) -> Result<Vec<u8>>;

/// Destination of the single response an invocation produces.
pub trait ResponseSink: Send + Sync {
    fn write(&self, response: &Response) -> Result<()>;
    fn location(&self) -> String;
}

/// Appends each response to a file, creating it when absent.
///
/// The file is neither truncated nor locked: one writer per invocation is
/// assumed, and repeated invocations against the same path accumulate.
pub struct FileResponseSink {
    path: PathBuf,
    encoder: Encoder,
}

impl FileResponseSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_encoder(path, Response::to_json_bytes)
    }

    pub fn with_encoder(path: impl Into<PathBuf>, encoder: Encoder) -> Self {
        Self {
            path: path.into(),
            encoder,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<std::fs::File> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o660);
        }
        options.open(&self.path)
    }
}

impl ResponseSink for FileResponseSink {
    fn write(&self, response: &Response) -> Result<()> {
        let mut file = self.open().map_err(|e| {
            CoreError::Io(format!("cannot open {}: {e}", self.path.display()))
        })?;

        // The handle is dropped on every return below, including a failed encode.
        let bytes = (self.encoder)(response)?;
        file.write_all(&bytes).map_err(|e| {
            CoreError::Io(format!("cannot write {}: {e}", self.path.display()))
        })?;
        file.flush()?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps responses in memory.
#[derive(Clone, Default)]
pub struct InMemoryResponseSink {
    responses: Arc<RwLock<Vec<Response>>>,
}

impl InMemoryResponseSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn responses(&self) -> Vec<Response> {
        self.responses
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl ResponseSink for InMemoryResponseSink {
    fn write(&self, response: &Response) -> Result<()> {
        let mut responses = self
            .responses
            .write()
            .map_err(|_| CoreError::Io("response sink lock poisoned".to_string()))?;
        responses.push(response.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
