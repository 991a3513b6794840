//! Convenience re-exports for building on the showroom engine

pub use crate::app::ShowroomApp;
pub use crate::error::ShowroomError;
pub use crate::gfx::stage::Stage;
pub use crate::scenes::default_registry;
pub use crate::showcase::{
    director::SceneDirector,
    persistence::SelectionStore,
    registry::{SceneDescriptor, SceneId, SceneRegistry},
    traits::ShowScene,
};
