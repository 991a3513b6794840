//! Scene registry for the showroom engine
//!
//! A read-only table mapping scene ids to everything the director needs to
//! present them: display text, the audio track, and a constructor for the
//! scene implementation. Module resolution happens through this capability
//! table rather than by loading code at runtime, so the registry stays pure
//! data plus one constructor per entry.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::ShowroomError;
use crate::showcase::traits::ShowScene;

/// Identifier for a registered scene
///
/// Small positive integers; scene 1 is the default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(pub u32);

impl SceneId {
    /// The scene shown when no valid selection is persisted
    pub const DEFAULT: SceneId = SceneId(1);
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Constructor capability for a scene implementation
pub type SceneBuilder = Box<dyn Fn() -> Box<dyn ShowScene>>;

/// Everything the director and UI need to know about one scene
pub struct SceneDescriptor {
    pub id: SceneId,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Looping background track, if the scene has one
    pub audio: Option<PathBuf>,
    pub build: SceneBuilder,
}

/// Read-only lookup from scene id to descriptor
///
/// Iteration order follows ascending id so menu buttons come out stable.
pub struct SceneRegistry {
    entries: BTreeMap<SceneId, SceneDescriptor>,
}

impl SceneRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds a descriptor, replacing any previous entry with the same id
    pub fn register(&mut self, descriptor: SceneDescriptor) {
        self.entries.insert(descriptor.id, descriptor);
    }

    /// Looks up a descriptor by id
    ///
    /// # Errors
    /// Returns [`ShowroomError::SceneNotFound`] when the id is absent.
    pub fn lookup(&self, id: SceneId) -> Result<&SceneDescriptor, ShowroomError> {
        self.entries
            .get(&id)
            .ok_or(ShowroomError::SceneNotFound(id))
    }

    /// Iterates descriptors in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &SceneDescriptor> {
        self.entries.values()
    }

    /// Number of registered scenes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no scenes are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::stage::Stage;

    struct NullScene;

    impl ShowScene for NullScene {
        fn initialize(&mut self, _stage: &mut Stage) -> anyhow::Result<()> {
            Ok(())
        }

        fn update(&mut self, _delta_time: f32, _stage: &mut Stage) {}

        fn name(&self) -> &str {
            "null"
        }
    }

    fn descriptor(id: u32) -> SceneDescriptor {
        SceneDescriptor {
            id: SceneId(id),
            display_name: "Test",
            description: "A test scene",
            audio: None,
            build: Box::new(|| Box::new(NullScene)),
        }
    }

    #[test]
    fn lookup_finds_registered_entries() {
        let mut registry = SceneRegistry::new();
        registry.register(descriptor(1));
        registry.register(descriptor(2));

        assert_eq!(registry.lookup(SceneId(2)).unwrap().id, SceneId(2));
    }

    #[test]
    fn lookup_rejects_unknown_ids() {
        let mut registry = SceneRegistry::new();
        registry.register(descriptor(1));

        match registry.lookup(SceneId(9)) {
            Err(ShowroomError::SceneNotFound(id)) => assert_eq!(id, SceneId(9)),
            other => panic!("expected SceneNotFound, got {:?}", other.map(|d| d.id)),
        }
    }

    #[test]
    fn iteration_follows_ascending_id_order() {
        let mut registry = SceneRegistry::new();
        registry.register(descriptor(3));
        registry.register(descriptor(1));
        registry.register(descriptor(2));

        let ids: Vec<u32> = registry.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
