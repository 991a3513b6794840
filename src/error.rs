//! Error types for the showroom engine
//!
//! Every failure in the showcase lifecycle is recovered locally: errors are
//! logged and the affected subsystem degrades (no audio, no active scene)
//! rather than taking the process down.

use std::path::PathBuf;

use thiserror::Error;

use crate::showcase::registry::SceneId;

/// Errors raised by the showcase lifecycle and its collaborators
#[derive(Debug, Error)]
pub enum ShowroomError {
    /// The requested scene id has no registry entry
    #[error("scene {0} is not registered")]
    SceneNotFound(SceneId),

    /// The outgoing scene failed while releasing its resources
    ///
    /// Cleanup is best-effort; the stage is still cleared afterwards.
    #[error("failed to dispose scene {id}")]
    ResourceDispose {
        id: SceneId,
        #[source]
        source: anyhow::Error,
    },

    /// Audio output could not be opened or the track failed to decode/play
    #[error("audio playback failed for {path:?}")]
    AudioPlayback {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The stage is not available to host scene content
    #[error("stage container is not available")]
    ContainerMissing,

    /// A scene's initialize hook failed
    #[error("scene {id} failed to initialize")]
    SceneInit {
        id: SceneId,
        #[source]
        source: anyhow::Error,
    },
}
