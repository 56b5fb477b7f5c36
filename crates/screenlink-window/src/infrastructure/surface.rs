//! Overlay surface that renders to the log.

use screenlink_core::Viewport;
use tracing::{debug, info};

use crate::application::rebuild_path::OverlaySurface;

/// Logs the overlay instead of drawing it.
///
/// Rebuilds run every few milliseconds, so only changes are logged.
#[derive(Debug, Default)]
pub struct TracingSurface {
    viewport: Option<Viewport>,
    path: String,
}

impl TracingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The path currently on display.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }
}

impl OverlaySurface for TracingSurface {
    fn set_viewport(&mut self, viewport: &Viewport) {
        if self.viewport.as_ref() != Some(viewport) {
            debug!(
                view_box = %viewport.view_box(),
                transform = %viewport.transform(),
                "overlay viewport changed"
            );
            self.viewport = Some(*viewport);
        }
    }

    fn set_path(&mut self, path: &str) {
        if self.path != path {
            info!("overlay path: {}", if path.is_empty() { "<empty>" } else { path });
            self.path = path.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use screenlink_core::WindowGeometry;

    use super::*;

    #[test]
    fn test_surface_keeps_latest_path_and_viewport() {
        let mut surface = TracingSurface::new();
        let viewport = Viewport::for_window(&WindowGeometry {
            screen_x: 10,
            screen_y: 20,
            avail_width: 800,
            avail_height: 600,
            outer_width: 100,
            inner_height: 100,
        });

        surface.set_viewport(&viewport);
        surface.set_path("M 60 70 Z");
        surface.set_path("M 60 70 Z");

        assert_eq!(surface.path(), "M 60 70 Z");
        assert_eq!(surface.viewport(), Some(&viewport));
    }
}
