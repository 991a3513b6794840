//! # Showcase Module
//!
//! The showcase machinery that turns a set of scene implementations into a
//! switchable exhibition: the registry of available scenes, the lifecycle
//! director that drives transitions between them, and the store that
//! remembers the last selection across runs.
//!
//! ## Key Components
//!
//! - [`ShowScene`] - Trait implemented by every switchable scene
//! - [`SceneRegistry`] - Lookup table from scene id to descriptor
//! - [`SceneDirector`] - Fade/dispose/load/fade transition coordinator
//! - [`SelectionStore`] - Durable last-selected-scene persistence

pub mod director;
pub mod persistence;
pub mod registry;
pub mod traits;

pub use director::{DirectorEvent, SceneDirector, ScenePhase};
pub use persistence::SelectionStore;
pub use registry::{SceneDescriptor, SceneId, SceneRegistry};
pub use traits::ShowScene;
