//! Application layer use cases for a ScreenLink window.
//!
//! - **`shared_store`** – The [`SharedStore`](shared_store::SharedStore) port
//!   and the [`JsonStore`](shared_store::JsonStore) adapter that encodes
//!   values and scopes enumeration by key prefix.
//!
//! - **`context`** – The per-load [`SessionContext`](context::SessionContext)
//!   (session key, store, clock, timing) handed to every use case.
//!
//! - **`publish_geometry`** – Writes this window's [`ScreenEntry`] on every
//!   publish tick.
//!
//! - **`screen_registry`** – Lists and decodes every peer entry.
//!
//! - **`reap_stale`** – Deletes peers that stopped refreshing their entry.
//!
//! - **`rebuild_path`** – Turns the registry snapshot into the overlay path
//!   and hands it to the drawing surface.
//!
//! - **`video_resume`** – Playback state machine and position persistence.
//!
//! - **`lifecycle`** – Owns timers and sequencing; every tick and external
//!   event arrives here as a [`WindowMessage`](lifecycle::WindowMessage).
//!
//! [`ScreenEntry`]: screenlink_core::ScreenEntry

pub mod context;
pub mod lifecycle;
pub mod publish_geometry;
pub mod reap_stale;
pub mod rebuild_path;
pub mod screen_registry;
pub mod shared_store;
pub mod video_resume;
