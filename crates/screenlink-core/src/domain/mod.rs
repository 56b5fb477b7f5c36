//! Domain entities for ScreenLink.
//!
//! Nothing in here touches a store, a clock, or a timer.  The application
//! layer feeds values in (geometry, timestamps, stored entries) and gets plain
//! values back (entries, keys, path strings), which keeps every rule here
//! testable on any machine without a display.

/// Window geometry, stored screen entries, and session keys.
pub mod screen;

/// Drawing instructions and the path-description string.
pub mod path;

/// Placement of the overlay surface in virtual desktop space.
pub mod viewport;
