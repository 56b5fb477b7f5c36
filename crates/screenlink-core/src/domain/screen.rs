//! Screen entry domain entity.
//!
//! Every live window owns exactly one [`ScreenEntry`] in the shared store,
//! stored under its [`SessionKey`] (`screen-<id>`).  The entry records where
//! the window sits in the virtual desktop, how large its display is, and when
//! it was last refreshed.  Peers only ever read it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocol::keys::SCREEN_KEY_PREFIX;

/// A point in virtual desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Geometry of the local window as reported by the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    /// X position of the window within the virtual desktop (may be negative).
    pub screen_x: i32,
    /// Y position of the window within the virtual desktop (may be negative).
    pub screen_y: i32,
    /// Available width of the display the window is on.
    pub avail_width: u32,
    /// Available height of the display the window is on.
    pub avail_height: u32,
    /// Outer width of the window, including decorations.
    pub outer_width: u32,
    /// Inner (content) height of the window.
    pub inner_height: u32,
}

/// One window's geometry as stored in the shared store.
///
/// Field names on the wire are camelCase so entries written by any
/// implementation of the key schema decode here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenEntry {
    pub screen_x: i32,
    pub screen_y: i32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub width: u32,
    pub height: u32,
    /// Milliseconds since the Unix epoch at the time of the last publish.
    pub last_updated: u64,
}

impl ScreenEntry {
    /// Builds the entry a window publishes for `geometry` at time `now_ms`.
    pub fn stamped(geometry: &WindowGeometry, now_ms: u64) -> Self {
        Self {
            screen_x: geometry.screen_x,
            screen_y: geometry.screen_y,
            screen_width: geometry.avail_width,
            screen_height: geometry.avail_height,
            width: geometry.outer_width,
            height: geometry.inner_height,
            last_updated: now_ms,
        }
    }

    /// Returns the center of the window in virtual desktop coordinates.
    ///
    /// Odd dimensions produce half-pixel coordinates.
    pub fn center(&self) -> Point {
        Point {
            x: f64::from(self.screen_x) + f64::from(self.width) / 2.0,
            y: f64::from(self.screen_y) + f64::from(self.height) / 2.0,
        }
    }

    /// Milliseconds elapsed since the entry was published.
    ///
    /// An entry stamped in the future (peer clock ahead of ours) has age 0.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_updated)
    }

    /// Returns `true` if the entry is strictly older than `threshold_ms`.
    pub fn is_stale(&self, now_ms: u64, threshold_ms: u64) -> bool {
        self.age_ms(now_ms) > threshold_ms
    }
}

/// Identifies one window's entry in the shared store.
///
/// Rendered as `screen-<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionKey(u64);

impl SessionKey {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric session id.
    pub fn id(&self) -> u64 {
        self.0
    }

    /// Parses a store key of the form `screen-<id>`.
    ///
    /// Returns `None` for keys outside the prefix or with a non-numeric suffix.
    pub fn parse(key: &str) -> Option<Self> {
        key.strip_prefix(SCREEN_KEY_PREFIX)?
            .parse::<u64>()
            .ok()
            .map(Self)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCREEN_KEY_PREFIX}{}", self.0)
    }
}

/// Picks the session key for a newly started window.
///
/// Returns one past the largest numeric id among `existing_keys`, or
/// `screen-0` when there is none.  Keys that do not parse as session keys are
/// ignored.
pub fn next_session_key<'a, I>(existing_keys: I) -> SessionKey
where
    I: IntoIterator<Item = &'a str>,
{
    existing_keys
        .into_iter()
        .filter_map(SessionKey::parse)
        .map(|key| key.id())
        .max()
        .map_or(SessionKey(0), |max| SessionKey(max.saturating_add(1)))
}
