//! Staleness reaper: removes entries of windows that stopped publishing.
//!
//! A window that crashes or is killed never runs its teardown, so its entry
//! would linger forever.  Every reap tick deletes entries older than the
//! reap threshold.  The caller's own entry is never touched here; the caller
//! is, by definition, still alive and publishing.

use tracing::{debug, info, warn};

use crate::application::context::SessionContext;
use crate::application::screen_registry::ScreenRegistry;

/// Deletes every stale peer entry and returns the keys that were removed.
///
/// An entry is stale when `now - lastUpdated` is strictly greater than the
/// configured reap threshold.  A failed delete is logged and the sweep
/// continues with the next entry.
pub fn reap_stale(ctx: &SessionContext, registry: &ScreenRegistry) -> Vec<String> {
    let now = ctx.now_ms();
    let threshold = ctx.timing.reap_threshold_ms();
    let own_key = ctx.own_key();

    let mut removed = Vec::new();
    for (key, entry) in registry.list() {
        if key == own_key || !entry.is_stale(now, threshold) {
            continue;
        }
        match ctx.store.remove(&key) {
            Ok(()) => {
                info!("reaped {key} (silent for {} ms)", entry.age_ms(now));
                removed.push(key);
            }
            Err(e) => warn!("failed to reap {key}: {e}"),
        }
    }

    if removed.is_empty() {
        debug!("reap sweep found no stale entries");
    }
    removed
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use screenlink_core::{ScreenEntry, SessionKey};

    use super::*;
    use crate::application::context::TimingConfig;
    use crate::application::shared_store::JsonStore;
    use crate::infrastructure::clock::ManualClock;
    use crate::infrastructure::store::MemoryStore;

    fn entry(last_updated: u64) -> ScreenEntry {
        ScreenEntry {
            screen_x: 0,
            screen_y: 0,
            screen_width: 1920,
            screen_height: 1080,
            width: 100,
            height: 100,
            last_updated,
        }
    }

    fn setup(now: u64) -> (SessionContext, ScreenRegistry) {
        let store = JsonStore::new(Arc::new(MemoryStore::new()));
        let ctx = SessionContext::new(
            SessionKey::new(0),
            store.clone(),
            Arc::new(ManualClock::new(now)),
            TimingConfig::default(),
        );
        (ctx, ScreenRegistry::new(store))
    }

    #[test]
    fn test_entry_older_than_threshold_is_removed() {
        // Arrange: threshold is 1000 ms
        let (ctx, registry) = setup(10_000);
        ctx.store.set_json("screen-1", &entry(8_999)).expect("write");

        // Act
        let removed = reap_stale(&ctx, &registry);

        // Assert
        assert_eq!(removed, vec!["screen-1".to_string()]);
        assert!(ctx.store.get_str("screen-1").expect("read").is_none());
    }

    #[test]
    fn test_entry_exactly_at_threshold_survives() {
        let (ctx, registry) = setup(10_000);
        ctx.store.set_json("screen-1", &entry(9_000)).expect("write");

        let removed = reap_stale(&ctx, &registry);

        assert!(removed.is_empty());
        assert!(ctx.store.get_str("screen-1").expect("read").is_some());
    }

    #[test]
    fn test_own_entry_is_never_reaped() {
        let (ctx, registry) = setup(10_000);
        ctx.store.set_json("screen-0", &entry(0)).expect("write");

        let removed = reap_stale(&ctx, &registry);

        assert!(removed.is_empty());
        assert!(ctx.store.get_str("screen-0").expect("read").is_some());
    }

    #[test]
    fn test_mixed_entries_only_stale_ones_go() {
        // Arrange
        let (ctx, registry) = setup(50_000);
        ctx.store.set_json("screen-1", &entry(49_900)).expect("write");
        ctx.store.set_json("screen-2", &entry(1_000)).expect("write");
        ctx.store.set_json("screen-3", &entry(48_500)).expect("write");

        // Act
        let removed = reap_stale(&ctx, &registry);

        // Assert
        assert_eq!(removed, vec!["screen-2".to_string(), "screen-3".to_string()]);
        let remaining: Vec<String> = registry.list().into_iter().map(|(k, _)| k).collect();
        assert_eq!(remaining, vec!["screen-1".to_string()]);
    }
}
