//! ScreenLink window entry point.
//!
//! Runs one headless window: it publishes its configured geometry to the
//! shared store directory, discovers and reaps peers, logs the overlay path
//! through every window center, and plays (in simulation) the shared video.
//! Start several processes with different `--x`/`--y` against the same
//! `--store-dir` to watch them find each other.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ AppConfig (TOML file, then CLI/env overrides)
//!  └─ WindowApp::start()          -- claims session id, starts timers
//!  └─ ctrl_c                      -- Unload
//!  └─ event loop
//!       └─ app.handle(msg) until AppControl::Exit
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use screenlink_window::application::lifecycle::{AppControl, WindowApp, WindowMessage};
use screenlink_window::application::shared_store::JsonStore;
use screenlink_window::application::video_resume::VideoResumeController;
use screenlink_window::infrastructure::{
    clock::SystemClock,
    media::{BlobUrlRegistry, SimulatedPlayer},
    scheduler::TokioScheduler,
    storage::config::{config_file_path, load_config, load_config_from, save_config_to, AppConfig},
    store::FileStore,
    surface::TracingSurface,
    window_info::StaticWindowGeometry,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// One ScreenLink window.
///
/// Every flag overrides the matching value from the configuration file.
#[derive(Debug, Parser)]
#[command(
    name = "screenlink",
    about = "Multi-window geometry sharing with a synchronized overlay and video",
    version
)]
struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long, env = "SCREENLINK_CONFIG")]
    config: Option<PathBuf>,

    /// Shared store directory; every coordinating window must use the same one.
    #[arg(long, env = "SCREENLINK_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Window left edge on the virtual desktop.
    #[arg(long, allow_hyphen_values = true, env = "SCREENLINK_X")]
    x: Option<i32>,

    /// Window top edge on the virtual desktop.
    #[arg(long, allow_hyphen_values = true, env = "SCREENLINK_Y")]
    y: Option<i32>,

    /// Outer window width in pixels.
    #[arg(long, env = "SCREENLINK_WIDTH")]
    width: Option<u32>,

    /// Inner window height in pixels.
    #[arg(long, env = "SCREENLINK_HEIGHT")]
    height: Option<u32>,

    #[arg(long, env = "SCREENLINK_SCREEN_WIDTH")]
    screen_width: Option<u32>,

    #[arg(long, env = "SCREENLINK_SCREEN_HEIGHT")]
    screen_height: Option<u32>,

    /// Video file to start playing in every window.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Length in seconds assumed for the video by the headless player.
    #[arg(long, env = "SCREENLINK_VIDEO_DURATION")]
    video_duration: Option<f64>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => load_config().context("failed to load config")?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Saves `config` where [`Cli::load_config`] would read it from.
    fn write_config(&self, config: &AppConfig) -> anyhow::Result<PathBuf> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => config_file_path().context("no platform config directory")?,
        };
        save_config_to(config, &path)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(path)
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.store_dir {
            config.store.dir = Some(dir.clone());
        }
        let window = &mut config.window;
        if let Some(x) = self.x {
            window.screen_x = x;
        }
        if let Some(y) = self.y {
            window.screen_y = y;
        }
        if let Some(width) = self.width {
            window.width = width;
        }
        if let Some(height) = self.height {
            window.height = height;
        }
        if let Some(w) = self.screen_width {
            window.screen_width = w;
        }
        if let Some(h) = self.screen_height {
            window.screen_height = h;
        }
        if let Some(secs) = self.video_duration {
            config.video.simulated_duration_secs = secs;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    config.validate().context("invalid configuration")?;
    if cli.write_config {
        let path = cli.write_config(&config)?;
        info!("configuration written to {}", path.display());
        return Ok(());
    }
    let timing = config.timing.to_timing();

    let store_dir = config
        .store_dir()
        .context("no store directory configured and no platform default available")?;
    let file_store = FileStore::open(&store_dir)
        .with_context(|| format!("cannot open shared store at {}", store_dir.display()))?;
    let store = JsonStore::new(Arc::new(file_store));
    info!("ScreenLink window starting (store: {})", store_dir.display());

    // ── Window wiring ─────────────────────────────────────────────────────────
    let (tx, mut rx) = mpsc::channel(256);

    let handles = BlobUrlRegistry::new();
    let duration = Duration::try_from_secs_f64(config.video.simulated_duration_secs)
        .context("video duration out of range")?;
    let player = SimulatedPlayer::new(handles.clone(), duration);
    let video = VideoResumeController::new(Some(Box::new(player)), config.video.resume_skip_secs);

    let mut app = WindowApp::new(
        store,
        Arc::new(SystemClock),
        timing.clone(),
        Box::new(StaticWindowGeometry::new(config.window.geometry())),
        Box::new(TokioScheduler::new(tx.clone())),
    )
    .with_surface(Box::new(TracingSurface::new()))
    .with_video(video, Arc::new(handles));

    let key = app.start();
    info!("window {key} ready");

    if let Some(path) = cli.video {
        app.handle(WindowMessage::FileChosen(path));
    }

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let unload_tx = tx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                let _ = unload_tx.send(WindowMessage::Unload).await;
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });
    drop(tx);

    // ── Event loop ────────────────────────────────────────────────────────────
    while let Some(msg) = rx.recv().await {
        if app.handle(msg) == AppControl::Exit {
            break;
        }
    }

    info!("ScreenLink window stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_leave_config_untouched() {
        let cli = Cli::parse_from(["screenlink"]);
        let mut config = AppConfig::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_flags_override_window_and_store() {
        // Arrange
        let cli = Cli::parse_from([
            "screenlink",
            "--x",
            "-1920",
            "--y",
            "40",
            "--width",
            "1024",
            "--store-dir",
            "/tmp/screenlink-shared",
            "--video-duration",
            "30",
        ]);
        let mut config = AppConfig::default();

        // Act
        cli.apply_overrides(&mut config);

        // Assert
        assert_eq!(config.window.screen_x, -1920);
        assert_eq!(config.window.screen_y, 40);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(
            config.store.dir,
            Some(PathBuf::from("/tmp/screenlink-shared"))
        );
        assert_eq!(config.video.simulated_duration_secs, 30.0);
    }

    #[test]
    fn test_config_file_flag_is_used() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = \"trace\"\n").expect("write");
        let cli = Cli::parse_from(["screenlink", "--config", path.to_str().expect("utf-8")]);

        let config = cli.load_config().expect("load");

        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_write_config_saves_overridden_values() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("screenlink").join("config.toml");
        let cli = Cli::parse_from([
            "screenlink",
            "--config",
            path.to_str().expect("utf-8"),
            "--x",
            "640",
            "--write-config",
        ]);
        let config = cli.load_config().expect("load");

        // Act
        let written = cli.write_config(&config).expect("write");

        // Assert
        assert_eq!(written, path);
        let reloaded = load_config_from(&path).expect("reload");
        assert_eq!(reloaded.window.screen_x, 640);
        assert_eq!(reloaded, config);
    }
}
