//! screenlink-window library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does a window do?
//!
//! Each running window:
//!
//! 1. Picks a session key (`screen-<id>`) one past the highest id already in
//!    the shared store.
//! 2. Publishes its geometry under that key on a short interval.
//! 3. Removes peers that stopped publishing.
//! 4. Reads every peer's geometry and rebuilds the overlay path through all
//!    window centers.
//! 5. Keeps the shared video's playback position in the store so a reload
//!    resumes where it left off, and restarts every window together when the
//!    video ends or is cleared.

/// Application layer: use cases and the window lifecycle.
pub mod application;

/// Infrastructure layer: stores, clock, timers, media, surfaces, and config.
pub mod infrastructure;
