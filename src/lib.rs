// src/lib.rs
//! Showroom 3D Engine
//!
//! A vehicle showcase engine built on wgpu and winit: switchable dioramas
//! with a fade transition, background audio, and a persistent scene
//! selection.

pub mod app;
pub mod audio;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod scenes;
pub mod showcase;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ShowroomApp;
pub use error::ShowroomError;

/// Creates a showroom application with the stock scenes and default store
pub fn default() -> ShowroomApp {
    let registry = scenes::default_registry();
    let store = showcase::persistence::SelectionStore::new(".showroom-scene");
    ShowroomApp::new(registry, store)
}
