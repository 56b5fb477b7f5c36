//! TOML-based configuration for the `screenlink` binary.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\ScreenLink\config.toml`
//! - Linux:    `~/.config/screenlink/config.toml`
//! - macOS:    `~/Library/Application Support/ScreenLink/config.toml`
//!
//! Every field has a serde default, so an empty or partial file is valid and
//! a missing file means "all defaults":
//!
//! ```toml
//! log_level = "debug"
//!
//! [timing]
//! publish_interval_ms = 10
//! reap_interval_ms = 100
//! reap_threshold_ms = 1000
//!
//! [store]
//! dir = "/tmp/screenlink"
//!
//! [video]
//! resume_skip_secs = 0.0
//! ```
//!
//! The shared store directory defaults to the platform data directory
//! (`$XDG_DATA_HOME/screenlink/store`, `%LOCALAPPDATA%\ScreenLink\store`, or
//! `~/Library/Application Support/ScreenLink/store`).  Every window that
//! should coordinate must point at the same directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use screenlink_core::WindowGeometry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::context::{TimingConfig, TimingError};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config or data directory could not be determined.
    #[error("could not determine platform directory")]
    NoPlatformDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The timing section is inconsistent.
    #[error("invalid timing: {0}")]
    Timing(#[from] TimingError),

    /// Some other value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub video: VideoSettings,
}

/// Coordination intervals, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingSettings {
    #[serde(default = "default_publish_interval_ms")]
    pub publish_interval_ms: u64,
    #[serde(default = "default_reap_interval_ms")]
    pub reap_interval_ms: u64,
    /// Entries silent for longer than this are deleted by peers.
    #[serde(default = "default_reap_threshold_ms")]
    pub reap_threshold_ms: u64,
    #[serde(default = "default_rebuild_interval_ms")]
    pub rebuild_interval_ms: u64,
    #[serde(default = "default_playback_persist_interval_ms")]
    pub playback_persist_interval_ms: u64,
    /// Upper bound (exclusive) of the random reload delay after a restart.
    #[serde(default = "default_restart_jitter_ms")]
    pub restart_jitter_ms: u64,
}

/// Location of the shared store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    /// Directory shared by all windows; the platform data dir when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Placement of a headless window on the virtual desktop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSettings {
    #[serde(default)]
    pub screen_x: i32,
    #[serde(default)]
    pub screen_y: i32,
    #[serde(default = "default_window_width")]
    pub width: u32,
    #[serde(default = "default_window_height")]
    pub height: u32,
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
}

/// Video playback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoSettings {
    /// Seconds added to the persisted position when playback resumes.
    #[serde(default)]
    pub resume_skip_secs: f64,
    /// Length assumed for every video by the headless player.
    #[serde(default = "default_simulated_duration_secs")]
    pub simulated_duration_secs: f64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_publish_interval_ms() -> u64 {
    10
}
fn default_reap_interval_ms() -> u64 {
    100
}
fn default_reap_threshold_ms() -> u64 {
    1_000
}
fn default_rebuild_interval_ms() -> u64 {
    10
}
fn default_playback_persist_interval_ms() -> u64 {
    1_000
}
fn default_restart_jitter_ms() -> u64 {
    1_000
}
fn default_window_width() -> u32 {
    800
}
fn default_window_height() -> u32 {
    600
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}
fn default_simulated_duration_secs() -> f64 {
    60.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            timing: TimingSettings::default(),
            store: StoreSettings::default(),
            window: WindowSettings::default(),
            video: VideoSettings::default(),
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            publish_interval_ms: default_publish_interval_ms(),
            reap_interval_ms: default_reap_interval_ms(),
            reap_threshold_ms: default_reap_threshold_ms(),
            rebuild_interval_ms: default_rebuild_interval_ms(),
            playback_persist_interval_ms: default_playback_persist_interval_ms(),
            restart_jitter_ms: default_restart_jitter_ms(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            screen_x: 0,
            screen_y: 0,
            width: default_window_width(),
            height: default_window_height(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            resume_skip_secs: 0.0,
            simulated_duration_secs: default_simulated_duration_secs(),
        }
    }
}

impl TimingSettings {
    pub fn to_timing(&self) -> TimingConfig {
        TimingConfig {
            publish_interval: Duration::from_millis(self.publish_interval_ms),
            reap_interval: Duration::from_millis(self.reap_interval_ms),
            reap_threshold: Duration::from_millis(self.reap_threshold_ms),
            rebuild_interval: Duration::from_millis(self.rebuild_interval_ms),
            playback_persist_interval: Duration::from_millis(self.playback_persist_interval_ms),
            restart_jitter: Duration::from_millis(self.restart_jitter_ms),
        }
    }
}

impl WindowSettings {
    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry {
            screen_x: self.screen_x,
            screen_y: self.screen_y,
            avail_width: self.screen_width,
            avail_height: self.screen_height,
            outer_width: self.width,
            inner_height: self.height,
        }
    }
}

impl AppConfig {
    /// Checks every value that has a valid range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Timing`] for inconsistent intervals and
    /// [`ConfigError::Invalid`] for out-of-range video settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.to_timing().validate()?;

        let skip = self.video.resume_skip_secs;
        if !skip.is_finite() || skip < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "video.resume_skip_secs must be a non-negative number, got {skip}"
            )));
        }
        let duration = self.video.simulated_duration_secs;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "video.simulated_duration_secs must be positive, got {duration}"
            )));
        }
        Ok(())
    }

    /// The store directory, falling back to the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformDir`] if no directory is configured
    /// and the platform default cannot be determined.
    pub fn store_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.store.dir {
            Some(dir) => Ok(dir.clone()),
            None => default_store_dir(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(platform_config_dir()
        .ok_or(ConfigError::NoPlatformDir)?
        .join("config.toml"))
}

/// Resolves the default shared store directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformDir`] if the base directory cannot be
/// determined.
pub fn default_store_dir() -> Result<PathBuf, ConfigError> {
    Ok(platform_data_dir()
        .ok_or(ConfigError::NoPlatformDir)?
        .join("store"))
}

/// Loads `AppConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("ScreenLink"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("screenlink"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("ScreenLink")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

fn platform_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("LOCALAPPDATA").map(|p| PathBuf::from(p).join("ScreenLink"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
            })?;
        Some(base.join("screenlink"))
    }

    #[cfg(target_os = "macos")]
    {
        platform_config_dir()
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
