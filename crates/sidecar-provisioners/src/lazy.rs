use sidecar_core::{CoreError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Connector<C> = Box<dyn Fn() -> Result<C> + Send + Sync>;

/// A backend connection opened on first use and reused afterwards.
///
/// A failed attempt caches nothing, so the next caller attempts again.
pub struct LazyConnection<C> {
    connector: Connector<C>,
    connection: Mutex<Option<Arc<C>>>,
    connects: AtomicUsize,
}

impl<C> LazyConnection<C> {
    pub fn new<F>(connector: F) -> Self
    where
        F: Fn() -> Result<C> + Send + Sync + 'static,
    {
        Self {
            connector: Box::new(connector),
            connection: Mutex::new(None),
            connects: AtomicUsize::new(0),
        }
    }

    /// Return the cached connection, establishing it if this is the first use.
    pub fn get(&self) -> Result<Arc<C>> {
        let mut slot = self
            .connection
            .lock()
            .map_err(|_| CoreError::Connection("connection lock poisoned".to_string()))?;

        if let Some(connection) = slot.as_ref() {
            return Ok(Arc::clone(connection));
        }

        let connection = Arc::new((self.connector)()?);
        self.connects.fetch_add(1, Ordering::SeqCst);
        *slot = Some(Arc::clone(&connection));
        Ok(connection)
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Number of successful connects. At most one for a healthy backend.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}
