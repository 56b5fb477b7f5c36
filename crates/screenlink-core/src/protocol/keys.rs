//! Key schema of the shared store.
//!
//! | Key             | Value                                   | Writer               |
//! |-----------------|-----------------------------------------|----------------------|
//! | `screen-<id>`   | JSON [`ScreenEntry`](crate::ScreenEntry)| owning window        |
//! | `videoFilePath` | raw media handle string                 | active playback window |
//! | `videoTime`     | JSON [`VideoTime`]                      | active playback window |
//!
//! Every key is last-writer-wins; there is no version check or merge.

use serde::{Deserialize, Serialize};

/// Prefix shared by every window's session key.
pub const SCREEN_KEY_PREFIX: &str = "screen-";

/// Holds the handle of the currently selected video resource.
///
/// The value is stored as-is, not JSON encoded.
pub const VIDEO_FILE_PATH_KEY: &str = "videoFilePath";

/// Holds the last persisted playback position.
pub const VIDEO_TIME_KEY: &str = "videoTime";

/// Stored playback position, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoTime {
    pub time: f64,
}
