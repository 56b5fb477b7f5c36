//! Placement of the overlay surface.
//!
//! Window centers are expressed in virtual desktop coordinates, but each
//! window draws on a surface whose origin is its own top-left corner.  The
//! surface is sized to the available display and shifted by the window's
//! negative offset, so a point at virtual `(x, y)` lands at the same physical
//! spot in every window.

use crate::domain::screen::WindowGeometry;

/// Size and offset of the overlay surface for one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Horizontal shift applied to the surface (the window's `-screen_x`).
    pub offset_x: i64,
    /// Vertical shift applied to the surface (the window's `-screen_y`).
    pub offset_y: i64,
}

impl Viewport {
    pub fn for_window(geometry: &WindowGeometry) -> Self {
        Self {
            width: geometry.avail_width,
            height: geometry.avail_height,
            offset_x: -i64::from(geometry.screen_x),
            offset_y: -i64::from(geometry.screen_y),
        }
    }

    /// The `viewBox` attribute of the surface, e.g. `"0 0 1920 1080"`.
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    /// The CSS transform that moves the surface into virtual desktop space.
    pub fn transform(&self) -> String {
        format!("translate({}px, {}px)", self.offset_x, self.offset_y)
    }
}
