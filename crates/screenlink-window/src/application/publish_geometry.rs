//! GeometryPublisher: writes this window's screen entry to the shared store.
//!
//! On every publish tick the publisher asks the [`WindowGeometrySource`] where
//! the window is, stamps the result with the current time, and overwrites the
//! window's own `screen-<id>` entry.  A failed tick leaves the previous entry
//! in place; the next successful tick heals it.

use screenlink_core::{ScreenEntry, WindowGeometry};
use thiserror::Error;
use tracing::trace;

use crate::application::context::SessionContext;
use crate::application::shared_store::StoreError;

/// Error type for window geometry lookup.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("window geometry unavailable: {0}")]
    Unavailable(String),
}

/// Error type for a single publish tick.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("failed to write screen entry: {0}")]
    Store(#[from] StoreError),
}

/// Reports the current geometry of the local window.
#[cfg_attr(test, mockall::automock)]
pub trait WindowGeometrySource: Send {
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the windowing system cannot be queried.
    fn current_geometry(&self) -> Result<WindowGeometry, GeometryError>;
}

/// Publishes one window's entry and keeps its timestamps non-decreasing.
#[derive(Debug, Default)]
pub struct GeometryPublisher {
    last_stamp: u64,
}

impl GeometryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the current geometry under the session key.
    ///
    /// If the clock has stepped backwards since the previous publish, the
    /// previous timestamp is reused so `lastUpdated` never decreases.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the geometry cannot be read or the store
    /// rejects the write.  The caller is expected to log and carry on.
    pub fn publish(
        &mut self,
        ctx: &SessionContext,
        source: &dyn WindowGeometrySource,
    ) -> Result<ScreenEntry, PublishError> {
        let geometry = source.current_geometry()?;
        let stamp = ctx.now_ms().max(self.last_stamp);
        let entry = ScreenEntry::stamped(&geometry, stamp);

        ctx.store.set_json(&ctx.own_key(), &entry)?;
        self.last_stamp = stamp;
        trace!(key = %ctx.session_key, stamp, "published screen entry");
        Ok(entry)
    }
}
