//! Window geometry adapters.
//!
//! A headless `screenlink` process has no real window to query, so its
//! placement comes from configuration or command-line flags.

use screenlink_core::WindowGeometry;

use crate::application::publish_geometry::{GeometryError, WindowGeometrySource};

/// Geometry source that always reports the placement it was built with.
#[derive(Debug, Clone, Copy)]
pub struct StaticWindowGeometry {
    geometry: WindowGeometry,
}

impl StaticWindowGeometry {
    pub fn new(geometry: WindowGeometry) -> Self {
        Self { geometry }
    }
}

impl WindowGeometrySource for StaticWindowGeometry {
    fn current_geometry(&self) -> Result<WindowGeometry, GeometryError> {
        Ok(self.geometry)
    }
}
