//! WindowApp: startup, teardown, restart, and event dispatch for one window.
//!
//! # Event model
//!
//! All state lives in [`WindowApp`] and is mutated only by [`WindowApp::handle`],
//! which the binary calls for every [`WindowMessage`] drained from its event
//! channel.  Timers never touch the store directly; a [`TaskScheduler`] turns
//! each period into a `Tick` message.  The scheduler owns every periodic
//! task, store polling included, so teardown and restart stop all of them.
//!
//! # Restart protocol
//!
//! ```text
//!  RestartRequested / MediaEnded / handle cleared
//!          │
//!          ▼
//!  cancel all timers ─► delete videoFilePath, videoTime ─► stop playback
//!          │
//!          ▼
//!  schedule one Reload after a random delay in [0, restart_jitter)
//!          │
//!          ▼
//!  Reload: teardown() then start() with a fresh session id
//! ```
//!
//! The random delay keeps every window from reloading in the same instant and
//! racing for the same session id.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use screenlink_core::{
    next_session_key, SessionKey, Viewport, SCREEN_KEY_PREFIX, VIDEO_FILE_PATH_KEY,
    VIDEO_TIME_KEY,
};
use tracing::{debug, info, trace, warn};

use crate::application::context::{Clock, SessionContext, TimingConfig};
use crate::application::publish_geometry::{GeometryPublisher, WindowGeometrySource};
use crate::application::reap_stale::reap_stale;
use crate::application::rebuild_path::{draw_overlay, rebuild_path, OverlaySurface};
use crate::application::screen_registry::ScreenRegistry;
use crate::application::shared_store::JsonStore;
use crate::application::video_resume::{
    PersistOutcome, PlaybackState, ResourceHandles, VideoResumeController,
};

/// The periodic jobs a running window performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodicTask {
    PublishGeometry,
    ReapStale,
    RebuildPath,
    /// Polls `videoFilePath` to join a video chosen elsewhere or follow a
    /// restart initiated elsewhere.
    WatchStore,
    PersistPlayback,
}

/// Everything that can happen to a window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowMessage {
    /// A periodic task is due.
    Tick(PeriodicTask),
    /// The user picked a local video file.
    FileChosen(std::path::PathBuf),
    /// The media player reached the end of the video.
    MediaEnded,
    /// Another window changed `key` in the shared store.
    StoreChanged { key: String },
    /// The user asked for a synchronized restart of every window.
    RestartRequested,
    /// The scheduled reload is due.
    Reload,
    /// The window is closing.
    Unload,
}

/// What the event loop should do after a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Owns the timers of one window.
pub trait TaskScheduler: Send {
    /// Starts (or restarts) `task` with the given period.
    fn start_periodic(&mut self, task: PeriodicTask, period: Duration);

    fn cancel(&mut self, task: PeriodicTask);

    /// Cancels every periodic task and any pending reload.
    fn cancel_all(&mut self);

    /// Arranges for exactly one `Reload` message after `delay`.
    fn schedule_reload(&mut self, delay: Duration);
}

struct ActiveSession {
    ctx: SessionContext,
    registry: ScreenRegistry,
    publisher: GeometryPublisher,
}

/// One coordinating window.
pub struct WindowApp {
    store: JsonStore,
    clock: Arc<dyn Clock>,
    timing: TimingConfig,
    geometry: Box<dyn WindowGeometrySource>,
    scheduler: Box<dyn TaskScheduler>,
    surface: Option<Box<dyn OverlaySurface>>,
    video: VideoResumeController,
    handles: Option<Arc<dyn ResourceHandles>>,
    session: Option<ActiveSession>,
    restart_pending: bool,
    last_path: String,
}

impl WindowApp {
    /// Creates a window that is not yet started and has no video support.
    pub fn new(
        store: JsonStore,
        clock: Arc<dyn Clock>,
        timing: TimingConfig,
        geometry: Box<dyn WindowGeometrySource>,
        scheduler: Box<dyn TaskScheduler>,
    ) -> Self {
        Self {
            store,
            clock,
            timing,
            geometry,
            scheduler,
            surface: None,
            video: VideoResumeController::new(None, 0.0),
            handles: None,
            session: None,
            restart_pending: false,
            last_path: String::new(),
        }
    }

    /// Attaches the surface the overlay path is drawn on.
    pub fn with_surface(mut self, surface: Box<dyn OverlaySurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Enables video playback.
    pub fn with_video(
        mut self,
        video: VideoResumeController,
        handles: Arc<dyn ResourceHandles>,
    ) -> Self {
        self.video = video;
        self.handles = Some(handles);
        self
    }

    /// The session key of the running window, if started.
    pub fn session_key(&self) -> Option<SessionKey> {
        self.session.as_ref().map(|s| s.ctx.session_key)
    }

    pub fn is_restart_pending(&self) -> bool {
        self.restart_pending
    }

    pub fn video_state(&self) -> PlaybackState {
        self.video.state()
    }

    /// The path produced by the most recent rebuild tick.
    pub fn last_path(&self) -> &str {
        &self.last_path
    }

    /// Claims a session id, publishes once, and starts every periodic task.
    ///
    /// Calling `start` on a running window returns its existing key.
    pub fn start(&mut self) -> SessionKey {
        if let Some(session) = &self.session {
            return session.ctx.session_key;
        }

        let key = self.allocate_session_key();
        let ctx = SessionContext::new(
            key,
            self.store.clone(),
            Arc::clone(&self.clock),
            self.timing.clone(),
        );

        // Publish immediately so the id is claimed before any peer allocates.
        let mut publisher = GeometryPublisher::new();
        if let Err(e) = publisher.publish(&ctx, self.geometry.as_ref()) {
            warn!("initial publish for {key} failed: {e}");
        }

        self.scheduler
            .start_periodic(PeriodicTask::PublishGeometry, self.timing.publish_interval);
        self.scheduler
            .start_periodic(PeriodicTask::ReapStale, self.timing.reap_interval);
        self.scheduler
            .start_periodic(PeriodicTask::RebuildPath, self.timing.rebuild_interval);
        self.scheduler
            .start_periodic(PeriodicTask::WatchStore, self.timing.playback_persist_interval);

        self.restart_pending = false;
        self.session = Some(ActiveSession {
            registry: ScreenRegistry::new(self.store.clone()),
            ctx,
            publisher,
        });
        self.resume_video();

        info!("window {key} started");
        key
    }

    /// Dispatches one event.
    pub fn handle(&mut self, msg: WindowMessage) -> AppControl {
        match msg {
            WindowMessage::Tick(task) => self.on_tick(task),
            WindowMessage::FileChosen(path) => self.on_file_chosen(&path),
            WindowMessage::MediaEnded => {
                if self.video.on_ended() {
                    self.restart();
                }
            }
            WindowMessage::StoreChanged { key } => {
                if key == VIDEO_FILE_PATH_KEY {
                    self.follow_shared_video();
                }
            }
            WindowMessage::RestartRequested => {
                self.restart();
            }
            WindowMessage::Reload => self.reload(),
            WindowMessage::Unload => {
                self.teardown();
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    /// Stops every timer, stops playback, and removes this window's entry.
    ///
    /// The video keys are left in place so the next load can resume.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.video.stop();
        self.restart_pending = false;

        if let Some(session) = self.session.take() {
            let own_key = session.ctx.own_key();
            match session.ctx.store.remove(&own_key) {
                Ok(()) => info!("window {own_key} torn down"),
                Err(e) => warn!("failed to remove {own_key} on teardown: {e}"),
            }
        }
    }

    /// Clears the shared video session and schedules a jittered reload.
    ///
    /// Returns the reload delay, or `None` if a reload was already pending.
    pub fn restart(&mut self) -> Option<Duration> {
        if self.restart_pending {
            debug!("restart already pending");
            return None;
        }

        self.scheduler.cancel_all();
        for key in [VIDEO_FILE_PATH_KEY, VIDEO_TIME_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("failed to clear {key} during restart: {e}");
            }
        }
        self.video.stop();

        let delay = restart_delay(self.timing.restart_jitter);
        self.scheduler.schedule_reload(delay);
        self.restart_pending = true;
        info!("restart scheduled in {} ms", delay.as_millis());
        Some(delay)
    }

    fn reload(&mut self) {
        debug!("reloading window");
        self.teardown();
        self.start();
    }

    fn allocate_session_key(&self) -> SessionKey {
        match self.store.keys_with_prefix(SCREEN_KEY_PREFIX) {
            Ok(keys) => next_session_key(keys.iter().map(String::as_str)),
            Err(e) => {
                warn!("could not list sessions, falling back to id 0: {e}");
                SessionKey::new(0)
            }
        }
    }

    fn on_tick(&mut self, task: PeriodicTask) {
        if self.restart_pending {
            trace!(?task, "tick ignored while restart is pending");
            return;
        }
        if task == PeriodicTask::WatchStore {
            self.follow_shared_video();
            return;
        }
        let Some(session) = self.session.as_mut() else {
            trace!(?task, "tick ignored after teardown");
            return;
        };

        let restart_needed = match task {
            PeriodicTask::PublishGeometry => {
                if let Err(e) = session.publisher.publish(&session.ctx, self.geometry.as_ref()) {
                    warn!("publish failed: {e}");
                }
                false
            }
            PeriodicTask::ReapStale => {
                reap_stale(&session.ctx, &session.registry);
                false
            }
            PeriodicTask::RebuildPath => {
                let path = rebuild_path(&session.registry);
                if let Some(surface) = self.surface.as_mut() {
                    let viewport = match self.geometry.current_geometry() {
                        Ok(geometry) => Some(Viewport::for_window(&geometry)),
                        Err(e) => {
                            debug!("drawing without viewport: {e}");
                            None
                        }
                    };
                    draw_overlay(surface.as_mut(), viewport.as_ref(), &path);
                }
                self.last_path = path;
                false
            }
            PeriodicTask::WatchStore => false,
            PeriodicTask::PersistPlayback => match self.video.persist_tick(&session.ctx) {
                Ok(outcome) => outcome == PersistOutcome::RestartRequired,
                Err(e) => {
                    warn!("failed to persist playback position: {e}");
                    false
                }
            },
        };

        if restart_needed {
            self.restart();
        }
    }

    fn on_file_chosen(&mut self, path: &Path) {
        if self.restart_pending {
            debug!("ignoring file selection while restart is pending");
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(handles) = self.handles.as_ref() else {
            warn!("video playback is not available in this window");
            return;
        };

        let handle = match handles.create_handle(path) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("cannot open {}: {e}", path.display());
                return;
            }
        };
        if let Err(e) = self.video.choose_file(&session.ctx, handle) {
            warn!("could not start video: {e}");
        }
        self.sync_persist_task();
    }

    /// Joins a video chosen elsewhere, or restarts if the followed one was
    /// cleared.
    fn follow_shared_video(&mut self) {
        if self.restart_pending || self.session.is_none() || !self.video.is_enabled() {
            return;
        }
        match self.store.get_str(VIDEO_FILE_PATH_KEY) {
            Ok(Some(handle)) if self.video.following() != Some(handle.as_str()) => {
                self.resume_video();
            }
            Ok(None) if self.video.is_following() => {
                self.restart();
            }
            Ok(_) => {}
            Err(e) => warn!("could not read {VIDEO_FILE_PATH_KEY}: {e}"),
        }
    }

    fn resume_video(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if let Err(e) = self.video.resume(&session.ctx) {
            warn!("could not resume video: {e}");
        }
        self.sync_persist_task();
    }

    /// Persistence runs exactly while a shared handle is being followed,
    /// including one that failed to load here.
    fn sync_persist_task(&mut self) {
        if self.video.is_following() {
            self.scheduler.start_periodic(
                PeriodicTask::PersistPlayback,
                self.timing.playback_persist_interval,
            );
        } else {
            self.scheduler.cancel(PeriodicTask::PersistPlayback);
        }
    }
}

/// Uniform delay in `[0, max)`; zero when `max` is zero.
fn restart_delay(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    rand::thread_rng().gen_range(Duration::ZERO..max)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use screenlink_core::{ScreenEntry, VideoTime, WindowGeometry};

    use super::*;
    use crate::application::publish_geometry::GeometryError;
    use crate::application::video_resume::{MediaError, MockMediaPlayer};
    use crate::infrastructure::clock::ManualClock;
    use crate::infrastructure::store::MemoryStore;

    #[derive(Debug, Default)]
    struct SchedulerLog {
        running: Vec<PeriodicTask>,
        reloads: Vec<Duration>,
    }

    /// Scheduler that records what the window asked for.
    struct RecordingScheduler(Arc<Mutex<SchedulerLog>>);

    impl TaskScheduler for RecordingScheduler {
        fn start_periodic(&mut self, task: PeriodicTask, _period: Duration) {
            let mut log = self.0.lock().expect("lock");
            log.running.retain(|t| *t != task);
            log.running.push(task);
        }

        fn cancel(&mut self, task: PeriodicTask) {
            self.0.lock().expect("lock").running.retain(|t| *t != task);
        }

        fn cancel_all(&mut self) {
            let mut log = self.0.lock().expect("lock");
            log.running.clear();
            log.reloads.clear();
        }

        fn schedule_reload(&mut self, delay: Duration) {
            self.0.lock().expect("lock").reloads.push(delay);
        }
    }

    struct FixedGeometry(WindowGeometry);

    impl WindowGeometrySource for FixedGeometry {
        fn current_geometry(&self) -> Result<WindowGeometry, GeometryError> {
            Ok(self.0)
        }
    }

    struct FixedHandles;

    impl ResourceHandles for FixedHandles {
        fn create_handle(&self, path: &Path) -> Result<String, MediaError> {
            Ok(format!("blob:screenlink/{}", path.display()))
        }
    }

    fn geometry() -> WindowGeometry {
        WindowGeometry {
            screen_x: 0,
            screen_y: 0,
            avail_width: 1920,
            avail_height: 1080,
            outer_width: 100,
            inner_height: 200,
        }
    }

    struct Harness {
        app: WindowApp,
        store: JsonStore,
        clock: Arc<ManualClock>,
        log: Arc<Mutex<SchedulerLog>>,
    }

    fn harness() -> Harness {
        let store = JsonStore::new(Arc::new(MemoryStore::new()));
        let clock = Arc::new(ManualClock::new(1_000));
        let log = Arc::new(Mutex::new(SchedulerLog::default()));
        let app = WindowApp::new(
            store.clone(),
            clock.clone(),
            TimingConfig::default(),
            Box::new(FixedGeometry(geometry())),
            Box::new(RecordingScheduler(Arc::clone(&log))),
        );
        Harness {
            app,
            store,
            clock,
            log,
        }
    }

    fn playing_player(position: f64) -> MockMediaPlayer {
        let mut player = MockMediaPlayer::new();
        player.expect_attach().returning(|_| Ok(()));
        player.expect_seek().return_const(());
        player.expect_play().returning(|| Ok(()));
        player.expect_pause().return_const(());
        player.expect_current_time().return_const(position);
        player.expect_has_ended().return_const(false);
        player
    }

    #[test]
    fn test_start_claims_next_id_and_publishes() {
        // Arrange
        let mut h = harness();
        let peer = ScreenEntry::stamped(&geometry(), 1_000);
        h.store.set_json("screen-0", &peer).expect("write");
        h.store.set_json("screen-2", &peer).expect("write");

        // Act
        let key = h.app.start();

        // Assert
        assert_eq!(key, SessionKey::new(3));
        assert!(h.store.get_str("screen-3").expect("read").is_some());
        let log = h.log.lock().expect("lock");
        assert_eq!(
            log.running,
            vec![
                PeriodicTask::PublishGeometry,
                PeriodicTask::ReapStale,
                PeriodicTask::RebuildPath,
                PeriodicTask::WatchStore
            ]
        );
    }

    #[test]
    fn test_start_on_empty_store_uses_id_zero() {
        let mut h = harness();
        assert_eq!(h.app.start(), SessionKey::new(0));
    }

    #[test]
    fn test_rebuild_tick_records_path() {
        let mut h = harness();
        h.app.start();

        h.app.handle(WindowMessage::Tick(PeriodicTask::RebuildPath));

        assert_eq!(h.app.last_path(), "M 50 100 Z");
    }

    #[test]
    fn test_publish_tick_refreshes_timestamp() {
        let mut h = harness();
        h.app.start();
        h.clock.set(1_500);

        h.app.handle(WindowMessage::Tick(PeriodicTask::PublishGeometry));

        let entry: ScreenEntry = h
            .store
            .get_json("screen-0")
            .expect("read")
            .expect("entry present");
        assert_eq!(entry.last_updated, 1_500);
    }

    #[test]
    fn test_unload_removes_own_entry_and_exits() {
        // Arrange
        let mut h = harness();
        h.app.start();

        // Act
        let control = h.app.handle(WindowMessage::Unload);

        // Assert
        assert_eq!(control, AppControl::Exit);
        assert!(h.store.get_str("screen-0").expect("read").is_none());
        assert!(h.log.lock().expect("lock").running.is_empty());
    }

    #[test]
    fn test_ticks_after_teardown_do_not_republish() {
        let mut h = harness();
        h.app.start();
        h.app.teardown();

        h.app.handle(WindowMessage::Tick(PeriodicTask::PublishGeometry));

        assert!(h.store.get_str("screen-0").expect("read").is_none());
    }

    #[test]
    fn test_restart_clears_video_keys_and_schedules_one_reload() {
        // Arrange
        let mut h = harness();
        h.app.start();
        h.store.set_str(VIDEO_FILE_PATH_KEY, "blob:screenlink/a").expect("write");
        h.store.set_json(VIDEO_TIME_KEY, &VideoTime { time: 3.0 }).expect("write");

        // Act
        let delay = h.app.restart().expect("restart scheduled");
        let second = h.app.restart();

        // Assert
        assert!(delay < Duration::from_millis(1_000));
        assert!(second.is_none(), "restart must be idempotent while pending");
        assert!(h.store.get_str(VIDEO_FILE_PATH_KEY).expect("read").is_none());
        assert!(h.store.get_str(VIDEO_TIME_KEY).expect("read").is_none());
        let log = h.log.lock().expect("lock");
        assert!(log.running.is_empty());
        assert_eq!(log.reloads, vec![delay]);
    }

    #[test]
    fn test_ticks_are_ignored_while_restart_is_pending() {
        let mut h = harness();
        h.app.start();
        h.app.handle(WindowMessage::RestartRequested);
        h.clock.set(9_000);

        h.app.handle(WindowMessage::Tick(PeriodicTask::PublishGeometry));

        let entry: ScreenEntry = h
            .store
            .get_json("screen-0")
            .expect("read")
            .expect("entry present");
        assert_eq!(entry.last_updated, 1_000);
    }

    #[test]
    fn test_reload_starts_a_new_session() {
        // Arrange
        let mut h = harness();
        h.app.start();
        h.app.handle(WindowMessage::RestartRequested);

        // Act
        let control = h.app.handle(WindowMessage::Reload);

        // Assert
        assert_eq!(control, AppControl::Continue);
        assert!(!h.app.is_restart_pending());
        assert_eq!(h.app.session_key(), Some(SessionKey::new(0)));
        assert_eq!(h.log.lock().expect("lock").running.len(), 4);
    }

    #[test]
    fn test_zero_jitter_reloads_immediately() {
        let store = JsonStore::new(Arc::new(MemoryStore::new()));
        let log = Arc::new(Mutex::new(SchedulerLog::default()));
        let timing = TimingConfig {
            restart_jitter: Duration::ZERO,
            ..TimingConfig::default()
        };
        let mut app = WindowApp::new(
            store,
            Arc::new(ManualClock::new(0)),
            timing,
            Box::new(FixedGeometry(geometry())),
            Box::new(RecordingScheduler(Arc::clone(&log))),
        );
        app.start();

        assert_eq!(app.restart(), Some(Duration::ZERO));
    }

    #[test]
    fn test_file_chosen_starts_playback_and_persistence() {
        // Arrange
        let h = harness();
        let mut app = h
            .app
            .with_video(
                VideoResumeController::new(Some(Box::new(playing_player(0.0))), 0.0),
                Arc::new(FixedHandles),
            );
        app.start();

        // Act
        app.handle(WindowMessage::FileChosen("clip.mp4".into()));

        // Assert
        assert_eq!(app.video_state(), PlaybackState::Playing);
        assert_eq!(
            h.store.get_str(VIDEO_FILE_PATH_KEY).expect("read").as_deref(),
            Some("blob:screenlink/clip.mp4")
        );
        assert!(h
            .log
            .lock()
            .expect("lock")
            .running
            .contains(&PeriodicTask::PersistPlayback));
    }

    #[test]
    fn test_file_chosen_without_video_support_is_ignored() {
        let mut h = harness();
        h.app.start();

        h.app.handle(WindowMessage::FileChosen("clip.mp4".into()));

        assert!(h.store.get_str(VIDEO_FILE_PATH_KEY).expect("read").is_none());
    }

    #[test]
    fn test_cleared_handle_on_persist_tick_triggers_restart() {
        // Arrange
        let h = harness();
        let mut app = h.app.with_video(
            VideoResumeController::new(Some(Box::new(playing_player(12.0))), 0.0),
            Arc::new(FixedHandles),
        );
        app.start();
        app.handle(WindowMessage::FileChosen("clip.mp4".into()));
        h.store.remove(VIDEO_FILE_PATH_KEY).expect("remove");

        // Act
        app.handle(WindowMessage::Tick(PeriodicTask::PersistPlayback));

        // Assert
        assert!(app.is_restart_pending());
        assert_eq!(h.log.lock().expect("lock").reloads.len(), 1);
    }

    #[test]
    fn test_media_ended_triggers_restart() {
        let h = harness();
        let mut app = h.app.with_video(
            VideoResumeController::new(Some(Box::new(playing_player(0.0))), 0.0),
            Arc::new(FixedHandles),
        );
        app.start();
        app.handle(WindowMessage::FileChosen("clip.mp4".into()));

        app.handle(WindowMessage::MediaEnded);

        assert!(app.is_restart_pending());
    }

    #[test]
    fn test_store_change_joins_video_chosen_elsewhere() {
        // Arrange
        let h = harness();
        let mut app = h.app.with_video(
            VideoResumeController::new(Some(Box::new(playing_player(0.0))), 0.0),
            Arc::new(FixedHandles),
        );
        app.start();
        h.store
            .set_str(VIDEO_FILE_PATH_KEY, "blob:screenlink/peer")
            .expect("write");

        // Act
        app.handle(WindowMessage::StoreChanged {
            key: VIDEO_FILE_PATH_KEY.to_string(),
        });

        // Assert
        assert_eq!(app.video_state(), PlaybackState::Playing);
    }

    fn unresolvable_player() -> MockMediaPlayer {
        let mut player = MockMediaPlayer::new();
        player
            .expect_attach()
            .returning(|h| Err(MediaError::UnknownHandle(h.to_string())));
        player.expect_pause().return_const(());
        player
    }

    #[test]
    fn test_window_that_cannot_load_video_still_joins_restart() {
        // Arrange: the recorded handle belongs to another process
        let h = harness();
        h.store
            .set_str(VIDEO_FILE_PATH_KEY, "blob:screenlink/other-process")
            .expect("write");
        let mut app = h.app.with_video(
            VideoResumeController::new(Some(Box::new(unresolvable_player())), 0.0),
            Arc::new(FixedHandles),
        );
        app.start();
        assert_eq!(app.video_state(), PlaybackState::Idle);
        assert!(h
            .log
            .lock()
            .expect("lock")
            .running
            .contains(&PeriodicTask::PersistPlayback));

        // Act: another window clears the shared video
        h.store.remove(VIDEO_FILE_PATH_KEY).expect("remove");
        app.handle(WindowMessage::Tick(PeriodicTask::PersistPlayback));

        // Assert
        assert!(app.is_restart_pending());
        assert_eq!(h.log.lock().expect("lock").reloads.len(), 1);
    }

    #[test]
    fn test_watch_tick_restarts_when_followed_handle_is_cleared() {
        let h = harness();
        h.store
            .set_str(VIDEO_FILE_PATH_KEY, "blob:screenlink/other-process")
            .expect("write");
        let mut app = h.app.with_video(
            VideoResumeController::new(Some(Box::new(unresolvable_player())), 0.0),
            Arc::new(FixedHandles),
        );
        app.start();
        h.store.remove(VIDEO_FILE_PATH_KEY).expect("remove");

        app.handle(WindowMessage::Tick(PeriodicTask::WatchStore));

        assert!(app.is_restart_pending());
        assert!(h.log.lock().expect("lock").running.is_empty());
    }

    #[test]
    fn test_watch_tick_joins_video_chosen_elsewhere() {
        // Arrange
        let h = harness();
        let mut app = h.app.with_video(
            VideoResumeController::new(Some(Box::new(playing_player(0.0))), 0.0),
            Arc::new(FixedHandles),
        );
        app.start();
        assert!(!h
            .log
            .lock()
            .expect("lock")
            .running
            .contains(&PeriodicTask::PersistPlayback));
        h.store
            .set_str(VIDEO_FILE_PATH_KEY, "blob:screenlink/peer")
            .expect("write");

        // Act
        app.handle(WindowMessage::Tick(PeriodicTask::WatchStore));

        // Assert
        assert_eq!(app.video_state(), PlaybackState::Playing);
        assert!(h
            .log
            .lock()
            .expect("lock")
            .running
            .contains(&PeriodicTask::PersistPlayback));
    }

    #[test]
    fn test_watch_tick_without_video_keys_does_nothing() {
        let h = harness();
        let mut app = h.app.with_video(
            VideoResumeController::new(Some(Box::new(MockMediaPlayer::new())), 0.0),
            Arc::new(FixedHandles),
        );
        app.start();

        app.handle(WindowMessage::Tick(PeriodicTask::WatchStore));

        assert!(!app.is_restart_pending());
        assert_eq!(app.video_state(), PlaybackState::Idle);
    }

    #[test]
    fn test_unrelated_store_change_is_ignored() {
        let mut h = harness();
        h.app.start();

        let control = h.app.handle(WindowMessage::StoreChanged {
            key: "screen-9".to_string(),
        });

        assert_eq!(control, AppControl::Continue);
        assert!(!h.app.is_restart_pending());
    }
}
