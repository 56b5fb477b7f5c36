//! Per-load session context and timing settings.
//!
//! A [`SessionContext`] is built once each time a window starts (or reloads)
//! and passed by reference to every use case.  It replaces free-floating
//! globals: the session key, the store handle, the clock, and the timing
//! constants all live here, so teardown and restart only have one thing to
//! drop.

use std::sync::Arc;
use std::time::Duration;

use screenlink_core::SessionKey;
use thiserror::Error;

use crate::application::shared_store::JsonStore;

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Errors in the timing configuration.
#[derive(Debug, Error, PartialEq)]
pub enum TimingError {
    /// An interval is zero.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    /// The reaper would run as often as (or more often than) windows publish.
    #[error("reap interval ({reap:?}) must be longer than the publish interval ({publish:?})")]
    ReapNotSlowerThanPublish { reap: Duration, publish: Duration },

    /// Live windows could be reaped between two sweeps.
    #[error("reap threshold ({threshold:?}) must be longer than the reap interval ({reap:?})")]
    ThresholdNotAboveReap { threshold: Duration, reap: Duration },
}

/// Intervals and thresholds that drive the coordination protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingConfig {
    /// How often a window rewrites its own entry.
    pub publish_interval: Duration,
    /// How often a window sweeps stale peers.
    pub reap_interval: Duration,
    /// Maximum age of an entry before it is considered dead.
    pub reap_threshold: Duration,
    /// How often the overlay path is rebuilt.
    pub rebuild_interval: Duration,
    /// How often the playback position is persisted.
    pub playback_persist_interval: Duration,
    /// Upper bound (exclusive) of the random delay before a restart reload.
    pub restart_jitter: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            publish_interval: Duration::from_millis(10),
            reap_interval: Duration::from_millis(100),
            reap_threshold: Duration::from_millis(1000),
            rebuild_interval: Duration::from_millis(10),
            playback_persist_interval: Duration::from_millis(1000),
            restart_jitter: Duration::from_millis(1000),
        }
    }
}

impl TimingConfig {
    /// Checks the ordering `publish < reap interval < reap threshold` and that
    /// every periodic interval is non-zero.
    ///
    /// `restart_jitter` may be zero (reload immediately).
    pub fn validate(&self) -> Result<(), TimingError> {
        let intervals = [
            ("publish_interval", self.publish_interval),
            ("reap_interval", self.reap_interval),
            ("reap_threshold", self.reap_threshold),
            ("rebuild_interval", self.rebuild_interval),
            ("playback_persist_interval", self.playback_persist_interval),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, d)| d.is_zero()) {
            return Err(TimingError::ZeroInterval(*name));
        }
        if self.reap_interval <= self.publish_interval {
            return Err(TimingError::ReapNotSlowerThanPublish {
                reap: self.reap_interval,
                publish: self.publish_interval,
            });
        }
        if self.reap_threshold <= self.reap_interval {
            return Err(TimingError::ThresholdNotAboveReap {
                threshold: self.reap_threshold,
                reap: self.reap_interval,
            });
        }
        Ok(())
    }

    /// Staleness threshold in whole milliseconds.
    pub fn reap_threshold_ms(&self) -> u64 {
        u64::try_from(self.reap_threshold.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Everything a use case needs to know about the current window load.
#[derive(Clone)]
pub struct SessionContext {
    pub session_key: SessionKey,
    pub store: JsonStore,
    pub clock: Arc<dyn Clock>,
    pub timing: TimingConfig,
}

impl SessionContext {
    pub fn new(
        session_key: SessionKey,
        store: JsonStore,
        clock: Arc<dyn Clock>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            session_key,
            store,
            clock,
            timing,
        }
    }

    /// The store key of this window's own entry.
    pub fn own_key(&self) -> String {
        self.session_key.to_string()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
