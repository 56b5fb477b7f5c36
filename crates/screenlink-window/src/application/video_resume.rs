//! VideoResumeController: durable playback position for the shared video.
//!
//! # States
//!
//! ```text
//!            choose_file / resume
//!   Idle ────────────────────────► Loading ──attach ok──► Playing ──end──► Ended
//!    ▲                                │                      │
//!    └──────── attach failed ─────────┘                      │ handle cleared
//!                                                            ▼
//!                                                       Interrupted
//! ```
//!
//! While `Playing`, every persistence tick writes the current position to
//! `videoTime`.  If another window cleared `videoFilePath` in the meantime
//! (a restart initiated elsewhere), the tick writes nothing and asks the
//! lifecycle to restart instead.
//!
//! A controller keeps following the handle it found in the store even when
//! attaching it failed, e.g. a handle minted by another process.  Such a
//! window never plays, but it still joins the restart once the handle is
//! cleared.
//!
//! `videoFilePath` and `videoTime` are deliberately left in the store on
//! teardown so a reload picks up where playback stopped; only a restart
//! deletes them.

use std::path::Path;

use screenlink_core::{VideoTime, VIDEO_FILE_PATH_KEY, VIDEO_TIME_KEY};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::context::SessionContext;
use crate::application::shared_store::StoreError;

/// Error type for the media element.
#[derive(Debug, Error, PartialEq)]
pub enum MediaError {
    /// The handle does not refer to any resource this process knows.
    #[error("unknown media handle {0:?}")]
    UnknownHandle(String),
    /// The resource exists but could not be loaded.
    #[error("failed to load media: {0}")]
    Load(String),
    /// Playback was requested before a resource was attached.
    #[error("no media attached")]
    NotAttached,
}

/// Error type for video resume operations.
#[derive(Debug, Error)]
pub enum VideoError {
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("video session store error: {0}")]
    Store(#[from] StoreError),
}

/// Playback states of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Ended,
    Interrupted,
}

/// Result of one persistence tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PersistOutcome {
    /// Nothing is playing; nothing was written.
    Skipped,
    /// The position (seconds) was written to `videoTime`.
    Persisted(f64),
    /// Playback ended or the shared handle disappeared; restart every window.
    RestartRequired,
}

/// The media element that plays the shared video.
#[cfg_attr(test, mockall::automock)]
pub trait MediaPlayer: Send {
    /// Loads the resource behind `handle`.
    fn attach(&mut self, handle: &str) -> Result<(), MediaError>;

    /// Moves the playhead to `position_secs`.
    fn seek(&mut self, position_secs: f64);

    /// Starts or resumes playback.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Current playhead position in seconds.
    fn current_time(&self) -> f64;

    /// `true` once playback reached the natural end of the media.
    fn has_ended(&self) -> bool;
}

/// Turns a chosen local file into an ephemeral handle other windows can name.
pub trait ResourceHandles: Send + Sync {
    /// # Errors
    ///
    /// Returns [`MediaError::Load`] if the file cannot be opened.
    fn create_handle(&self, path: &Path) -> Result<String, MediaError>;
}

/// Drives playback of the single shared video.
pub struct VideoResumeController {
    player: Option<Box<dyn MediaPlayer>>,
    state: PlaybackState,
    following: Option<String>,
    resume_skip_secs: f64,
}

impl VideoResumeController {
    /// Creates an idle controller.
    ///
    /// `player` is `None` when the window has no video surface; every
    /// operation is then a no-op.  `resume_skip_secs` is added to the
    /// persisted position when playback resumes.
    pub fn new(player: Option<Box<dyn MediaPlayer>>, resume_skip_secs: f64) -> Self {
        Self {
            player,
            state: PlaybackState::Idle,
            following: None,
            resume_skip_secs,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// `false` when the window has no video surface.
    pub fn is_enabled(&self) -> bool {
        self.player.is_some()
    }

    /// The shared handle this window last tried to load, whether or not the
    /// load succeeded.
    pub fn following(&self) -> Option<&str> {
        self.following.as_deref()
    }

    pub fn is_following(&self) -> bool {
        self.following.is_some()
    }

    /// Records a newly chosen file in the store and starts playing it.
    ///
    /// A handle different from the stored one starts from the beginning: the
    /// previous `videoTime` is deleted before the new handle is published.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::Store`] if the handle cannot be persisted (the
    /// controller stays `Idle`), or [`VideoError::Media`] if loading fails.
    pub fn choose_file(
        &mut self,
        ctx: &SessionContext,
        handle: String,
    ) -> Result<PlaybackState, VideoError> {
        let previous = ctx.store.get_str(VIDEO_FILE_PATH_KEY)?;
        if previous.as_deref() != Some(handle.as_str()) {
            ctx.store.remove(VIDEO_TIME_KEY)?;
        }
        ctx.store.set_str(VIDEO_FILE_PATH_KEY, &handle)?;
        info!("video selected: {handle}");
        self.load(ctx, handle)
    }

    /// Resumes the video recorded in the store, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError`] if the store cannot be read or the recorded
    /// handle cannot be loaded.
    pub fn resume(&mut self, ctx: &SessionContext) -> Result<PlaybackState, VideoError> {
        match ctx.store.get_str(VIDEO_FILE_PATH_KEY)? {
            Some(handle) => self.load(ctx, handle),
            None => {
                debug!("no video recorded; staying idle");
                self.state = PlaybackState::Idle;
                Ok(self.state)
            }
        }
    }

    /// Writes the current position, or reports that a restart is needed.
    ///
    /// A cleared handle requires a restart from any state, as long as this
    /// window was following one.  A handle replaced by another window is
    /// left alone; the lifecycle switches to it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read or written; the
    /// position is simply written again on the next tick.
    pub fn persist_tick(&mut self, ctx: &SessionContext) -> Result<PersistOutcome, StoreError> {
        let (Some(player), Some(following)) = (self.player.as_ref(), self.following.as_deref())
        else {
            return Ok(PersistOutcome::Skipped);
        };

        match ctx.store.get_str(VIDEO_FILE_PATH_KEY)? {
            None => {
                info!("video handle was cleared by another window");
                self.state = PlaybackState::Interrupted;
                return Ok(PersistOutcome::RestartRequired);
            }
            Some(stored) if stored != following => {
                debug!("video handle replaced with {stored}; not persisting");
                return Ok(PersistOutcome::Skipped);
            }
            Some(_) => {}
        }
        if self.state != PlaybackState::Playing {
            return Ok(PersistOutcome::Skipped);
        }
        if player.has_ended() {
            info!("video reached its end");
            self.state = PlaybackState::Ended;
            return Ok(PersistOutcome::RestartRequired);
        }

        let time = player.current_time();
        ctx.store.set_json(VIDEO_TIME_KEY, &VideoTime { time })?;
        Ok(PersistOutcome::Persisted(time))
    }

    /// Handles the end-of-media signal.
    ///
    /// Returns `true` if the signal should trigger a restart (something was
    /// loaded or playing).
    pub fn on_ended(&mut self) -> bool {
        match self.state {
            PlaybackState::Loading | PlaybackState::Playing => {
                self.state = PlaybackState::Ended;
                true
            }
            _ => false,
        }
    }

    /// Pauses playback and stops following the handle.  The store is untouched.
    pub fn stop(&mut self) {
        if let Some(player) = self.player.as_mut() {
            if matches!(self.state, PlaybackState::Loading | PlaybackState::Playing) {
                player.pause();
            }
        }
        self.state = PlaybackState::Idle;
        self.following = None;
    }

    fn load(&mut self, ctx: &SessionContext, handle: String) -> Result<PlaybackState, VideoError> {
        let Some(player) = self.player.as_mut() else {
            debug!("no video surface attached; ignoring {handle}");
            self.state = PlaybackState::Idle;
            return Ok(self.state);
        };

        self.following = Some(handle.clone());
        self.state = PlaybackState::Loading;
        if let Err(e) = player.attach(&handle) {
            warn!("could not attach {handle}: {e}");
            self.state = PlaybackState::Idle;
            return Err(e.into());
        }

        let start = stored_position(ctx) + self.resume_skip_secs;
        player.seek(start);
        if let Err(e) = player.play() {
            self.state = PlaybackState::Idle;
            return Err(e.into());
        }

        info!("playing {handle} from {start:.3}s");
        self.state = PlaybackState::Playing;
        Ok(self.state)
    }
}

/// Reads the persisted position, treating an absent or unreadable value as 0.
fn stored_position(ctx: &SessionContext) -> f64 {
    match ctx.store.get_json::<VideoTime>(VIDEO_TIME_KEY) {
        Ok(Some(VideoTime { time })) if time.is_finite() && time >= 0.0 => time,
        Ok(_) => 0.0,
        Err(e) => {
            warn!("ignoring stored playback position: {e}");
            0.0
        }
    }
}
