//! Media adapters: resource handles and a headless player.
//!
//! A chosen file is never written to the shared store by path.  Instead it is
//! registered under an opaque `blob:screenlink/<uuid>` handle that is only
//! meaningful inside the process that created it, and the handle is what
//! peers see.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use crate::application::video_resume::{MediaError, MediaPlayer, ResourceHandles};

const HANDLE_SCHEME: &str = "blob:screenlink/";

/// Maps ephemeral handles to local files.
#[derive(Debug, Clone, Default)]
pub struct BlobUrlRegistry {
    entries: Arc<RwLock<HashMap<String, PathBuf>>>,
}

impl BlobUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The file behind `handle`, if this process created it.
    pub fn resolve(&self, handle: &str) -> Option<PathBuf> {
        self.entries.read().ok()?.get(handle).cloned()
    }
}

impl ResourceHandles for BlobUrlRegistry {
    fn create_handle(&self, path: &Path) -> Result<String, MediaError> {
        if !path.is_file() {
            return Err(MediaError::Load(format!(
                "{} is not a readable file",
                path.display()
            )));
        }
        let handle = format!("{HANDLE_SCHEME}{}", Uuid::new_v4());
        self.entries
            .write()
            .map_err(|_| MediaError::Load("handle registry lock poisoned".to_string()))?
            .insert(handle.clone(), path.to_path_buf());
        debug!("registered {} as {handle}", path.display());
        Ok(handle)
    }
}

/// A player without a screen: it tracks position against the monotonic clock.
pub struct SimulatedPlayer {
    handles: BlobUrlRegistry,
    duration: Duration,
    source: Option<PathBuf>,
    /// Position when playback last started or was seeked.
    anchor_secs: f64,
    playing_since: Option<Instant>,
}

impl SimulatedPlayer {
    /// Creates a player that resolves handles through `handles` and treats
    /// every video as `duration` long.
    pub fn new(handles: BlobUrlRegistry, duration: Duration) -> Self {
        Self {
            handles,
            duration,
            source: None,
            anchor_secs: 0.0,
            playing_since: None,
        }
    }

    /// The file currently attached.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn attach(&mut self, handle: &str) -> Result<(), MediaError> {
        let path = self
            .handles
            .resolve(handle)
            .ok_or_else(|| MediaError::UnknownHandle(handle.to_string()))?;
        self.source = Some(path);
        self.anchor_secs = 0.0;
        self.playing_since = None;
        Ok(())
    }

    fn seek(&mut self, position_secs: f64) {
        self.anchor_secs = position_secs.clamp(0.0, self.duration_secs());
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.source.is_none() {
            return Err(MediaError::NotAttached);
        }
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.anchor_secs = self.current_time();
        self.playing_since = None;
    }

    fn current_time(&self) -> f64 {
        let elapsed = self
            .playing_since
            .map_or(0.0, |since| since.elapsed().as_secs_f64());
        (self.anchor_secs + elapsed).min(self.duration_secs())
    }

    fn has_ended(&self) -> bool {
        self.source.is_some() && self.current_time() >= self.duration_secs()
    }
}
