//! ScreenRegistry: snapshot of every window entry in the shared store.
//!
//! Peers write, delete, and rewrite their entries at any moment, so a listing
//! is only a best-effort snapshot.  Anything that cannot be read cleanly
//! (malformed JSON, a key deleted between enumeration and read, a store
//! hiccup) is left out rather than reported.

use screenlink_core::{decode_value, ScreenEntry, SessionKey, SCREEN_KEY_PREFIX};
use tracing::{debug, warn};

use crate::application::shared_store::JsonStore;

/// One decoded entry together with the store key it was read from.
pub type RegistryEntry = (String, ScreenEntry);

/// Read-only view over the `screen-` entries of a store.
#[derive(Clone)]
pub struct ScreenRegistry {
    store: JsonStore,
}

impl ScreenRegistry {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Lists every decodable screen entry.
    ///
    /// Entries are ordered by numeric session id (keys with a non-numeric
    /// suffix last, by key) so every window walks peers in the same order.
    pub fn list(&self) -> Vec<RegistryEntry> {
        let keys = match self.store.keys_with_prefix(SCREEN_KEY_PREFIX) {
            Ok(keys) => keys,
            Err(e) => {
                warn!("could not enumerate screen entries: {e}");
                return Vec::new();
            }
        };

        let mut entries: Vec<RegistryEntry> = keys
            .into_iter()
            .filter_map(|key| {
                let text = match self.store.get_str(&key) {
                    Ok(Some(text)) => text,
                    Ok(None) => {
                        debug!("{key} vanished before it could be read");
                        return None;
                    }
                    Err(e) => {
                        debug!("failed to read {key}: {e}");
                        return None;
                    }
                };
                match decode_value::<ScreenEntry>(&text) {
                    Ok(entry) => Some((key, entry)),
                    Err(e) => {
                        debug!("skipping {key}: {e}");
                        None
                    }
                }
            })
            .collect();

        entries.sort_by(|(a, _), (b, _)| sort_key(a).cmp(&sort_key(b)));
        entries
    }
}

fn sort_key(key: &str) -> (u64, &str) {
    (
        SessionKey::parse(key).map_or(u64::MAX, |k| k.id()),
        key,
    )
}
