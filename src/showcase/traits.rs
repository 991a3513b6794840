//! Core scene trait for the showroom engine
//!
//! Defines the interface every switchable scene implements so the lifecycle
//! director can construct, run, and tear it down without knowing anything
//! about its content.

use imgui::Ui;

use crate::gfx::stage::Stage;

/// A self-contained 3D presentation that can be swapped in and out
///
/// Scenes own no GPU state directly; they populate the shared [`Stage`]
/// during [`initialize`](ShowScene::initialize) and animate it every frame.
/// The director guarantees the stage is empty when `initialize` runs and
/// that `dispose` is called at most once before the stage is cleared.
pub trait ShowScene {
    /// Build the scene's content on the stage
    ///
    /// Called once when the director activates the scene. Use this to add
    /// objects and materials, set lighting and backdrop, and frame the
    /// camera.
    ///
    /// # Arguments
    /// * `stage` - Empty stage the scene should populate
    fn initialize(&mut self, stage: &mut Stage) -> anyhow::Result<()>;

    /// Advance the scene's animation by one frame
    ///
    /// # Arguments
    /// * `delta_time` - Seconds elapsed since the previous frame
    /// * `stage` - Stage holding this scene's objects
    fn update(&mut self, delta_time: f32, stage: &mut Stage);

    /// Render scene-specific UI controls
    ///
    /// Most dioramas have none; the default does nothing.
    fn render_ui(&mut self, _ui: &Ui) {}

    /// Scene name for logging and UI display
    fn name(&self) -> &str;

    /// Release any resources the scene holds outside the stage
    ///
    /// The stage itself is cleared by the director after this returns, so
    /// most scenes keep the default no-op.
    fn dispose(&mut self, _stage: &mut Stage) -> anyhow::Result<()> {
        Ok(())
    }
}
