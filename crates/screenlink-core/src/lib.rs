//! # screenlink-core
//!
//! Shared library for ScreenLink containing the domain entities, the shared
//! store key schema, and the overlay path builder.
//!
//! This crate has zero dependencies on OS APIs, timers, or storage backends.
//!
//! # Architecture overview
//!
//! ScreenLink lets several independent windows, possibly on different
//! monitors, find each other through a shared key-value store and draw one
//! connecting line through all of their centers.  Each window periodically
//! writes its own geometry under a `screen-<id>` key, reads everybody else's,
//! and turns the result into a path-description string.
//!
//! - **`domain`** – Pure logic: [`ScreenEntry`], [`SessionKey`] and id
//!   generation, the [`PathBuilder`], and the [`Viewport`] that places the
//!   overlay in virtual desktop coordinates.
//!
//! - **`protocol`** – What the shared store contains: key names and the JSON
//!   value codec.

pub mod domain;
pub mod protocol;

pub use domain::path::{connect_centers, parse_path, PathBuilder, PathCommand, PathError};
pub use domain::screen::{next_session_key, Point, ScreenEntry, SessionKey, WindowGeometry};
pub use domain::viewport::Viewport;
pub use protocol::codec::{decode_value, encode_value, CodecError};
pub use protocol::keys::{VideoTime, SCREEN_KEY_PREFIX, VIDEO_FILE_PATH_KEY, VIDEO_TIME_KEY};
