//! Overlay rebuild: registry snapshot in, path-description string out.
//!
//! Every rebuild tick starts from a fresh [`PathBuilder`](screenlink_core::PathBuilder),
//! so no state survives between cycles.  The result goes to the
//! [`OverlaySurface`] if one is attached; without a surface the path is still
//! computed but nothing is drawn.

use screenlink_core::{connect_centers, Viewport};

use crate::application::screen_registry::ScreenRegistry;

/// Drawing surface that displays the overlay path.
pub trait OverlaySurface: Send {
    /// Sizes and positions the surface in virtual desktop space.
    fn set_viewport(&mut self, viewport: &Viewport);

    /// Replaces the displayed path.
    fn set_path(&mut self, path: &str);
}

/// Rebuilds the overlay path from the current registry snapshot.
pub fn rebuild_path(registry: &ScreenRegistry) -> String {
    let entries = registry.list();
    connect_centers(entries.iter().map(|(_, entry)| entry)).serialize()
}

/// Hands a rebuilt path to `surface`, applying `viewport` first when known.
pub fn draw_overlay(surface: &mut dyn OverlaySurface, viewport: Option<&Viewport>, path: &str) {
    if let Some(viewport) = viewport {
        surface.set_viewport(viewport);
    }
    surface.set_path(path);
}
