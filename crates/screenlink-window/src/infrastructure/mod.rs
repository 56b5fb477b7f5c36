//! Infrastructure layer for the window runtime.
//!
//! Contains the adapters behind the application ports: shared stores, clocks,
//! timers, media playback, overlay drawing, window geometry, and the TOML
//! configuration file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `screenlink_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.
//!
//! # Sub-modules
//!
//! - **`store`** – `MemoryStore` (in-process, optional byte quota) and
//!   `FileStore` (one file per key in a shared directory, so separate
//!   processes can coordinate).
//!
//! - **`clock`** – `SystemClock` for production and `ManualClock` for tests.
//!
//! - **`scheduler`** – `TokioScheduler`, which turns periodic tasks and the
//!   restart reload into `WindowMessage`s on the event channel.
//!
//! - **`media`** – `BlobUrlRegistry` (file path to `blob:` handle) and
//!   `SimulatedPlayer`, a clock-driven stand-in for a video element.
//!
//! - **`surface`** – `TracingSurface`, which logs every overlay change.
//!
//! - **`window_info`** – `StaticWindowGeometry`, the geometry source for a
//!   headless window whose placement comes from configuration.
//!
//! - **`storage`** – TOML configuration persistence.

pub mod clock;
pub mod media;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod surface;
pub mod window_info;
