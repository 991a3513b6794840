//! Durable persistence of the last-selected scene
//!
//! One file, one key: the selected scene id as a string-encoded integer.
//! Reads fall back to the default scene on any problem; writes log and
//! swallow their errors so persistence can never interfere with a running
//! transition.

use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::showcase::registry::SceneId;

/// File-backed store for the last-selected scene id
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    /// Creates a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writes the selection synchronously
    ///
    /// Failures are logged and ignored; the store never raises.
    pub fn save(&self, id: SceneId) {
        if let Err(err) = fs::write(&self.path, id.0.to_string()) {
            warn!(
                "failed to persist scene selection to {:?}: {}",
                self.path, err
            );
        }
    }

    /// Reads the stored selection
    ///
    /// Returns [`SceneId::DEFAULT`] when the file is missing, unreadable,
    /// non-numeric, or not a positive integer. Ids that parse but are not
    /// registered are returned as-is; the registry rejects them at lookup.
    pub fn load(&self) -> SceneId {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!("no persisted scene selection ({}), using default", err);
                return SceneId::DEFAULT;
            }
        };

        match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => SceneId(n),
            _ => {
                warn!(
                    "persisted scene selection {:?} is invalid, using default",
                    raw.trim()
                );
                SceneId::DEFAULT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch_store() -> SelectionStore {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "showroom-selection-{}-{}",
            std::process::id(),
            n
        ));
        let _ = fs::remove_file(&path);
        SelectionStore::new(path)
    }

    #[test]
    fn round_trips_a_valid_id() {
        let store = scratch_store();
        store.save(SceneId(3));
        assert_eq!(store.load(), SceneId(3));
    }

    #[test]
    fn defaults_when_nothing_was_saved() {
        let store = scratch_store();
        assert_eq!(store.load(), SceneId::DEFAULT);
    }

    #[test]
    fn defaults_on_garbage_content() {
        let store = scratch_store();
        fs::write(&store.path, "not a number").unwrap();
        assert_eq!(store.load(), SceneId::DEFAULT);
    }

    #[test]
    fn defaults_on_zero() {
        let store = scratch_store();
        fs::write(&store.path, "0").unwrap();
        assert_eq!(store.load(), SceneId::DEFAULT);
    }

    #[test]
    fn save_overwrites_previous_selection() {
        let store = scratch_store();
        store.save(SceneId(2));
        store.save(SceneId(4));
        assert_eq!(store.load(), SceneId(4));
    }
}
