//! # UI Module
//!
//! ImGui-based interface: the scene-switch menu, the description overlay,
//! and the manager that wires imgui into wgpu and winit.

pub mod manager;
pub mod overlay;

pub use manager::UiManager;
pub use overlay::{DescriptionOverlay, SceneMenu};
