//! Scene menu and description overlay
//!
//! The menu is one button per registered scene, centered along the top of
//! the window; it fades with the scene because it belongs to the stage.
//! The description panel swaps its text after a short delay and then fades
//! in, independent of scene transitions.

use imgui::{Condition, StyleVar, Ui};

use crate::showcase::registry::{SceneId, SceneRegistry};

/// Seconds between a description change and the text swap
pub const DESCRIPTION_SWAP_DELAY_SECS: f32 = 1.5;
/// Seconds the freshly swapped description takes to fade in
pub const DESCRIPTION_FADE_SECS: f32 = 1.5;

/// Description panel state: the visible text and its fade timeline
pub struct DescriptionOverlay {
    text: String,
    pending: Option<String>,
    delay_remaining: f32,
    alpha: f32,
}

impl DescriptionOverlay {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            pending: None,
            delay_remaining: 0.0,
            alpha: 0.0,
        }
    }

    /// Queues new text: the panel dims now, swaps after the delay, then
    /// fades back in
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.pending = Some(text.into());
        self.delay_remaining = DESCRIPTION_SWAP_DELAY_SECS;
        self.alpha = 0.0;
    }

    /// Advances the swap delay and fade timeline
    pub fn update(&mut self, delta_time: f32) {
        if self.pending.is_some() {
            self.delay_remaining -= delta_time;
            if self.delay_remaining <= 0.0 {
                self.text = self.pending.take().unwrap();
            }
            return;
        }

        if !self.text.is_empty() && self.alpha < 1.0 {
            self.alpha = (self.alpha + delta_time / DESCRIPTION_FADE_SECS).min(1.0);
        }
    }

    /// Current panel opacity in `[0, 1]`
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// The text currently shown (empty until the first swap completes)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Draws the description panel in the top-right corner
    pub fn render(&self, ui: &Ui) {
        if self.text.is_empty() || self.alpha <= 0.0 {
            return;
        }

        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return;
        }

        let width = 340.0;
        let _alpha = ui.push_style_var(StyleVar::Alpha(self.alpha));
        ui.window("scene-description")
            .position([display_size[0] - width - 10.0, 10.0], Condition::Always)
            .size([width, 0.0], Condition::Always)
            .no_decoration()
            .bg_alpha(0.7)
            .build(|| {
                ui.text_wrapped(&self.text);
            });
    }
}

impl Default for DescriptionOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene-switch menu
///
/// One button per registry entry; clicking returns the target id for the
/// app to feed into the director.
pub struct SceneMenu;

impl SceneMenu {
    /// Draws the menu and reports a clicked scene, if any
    ///
    /// # Arguments
    /// * `ui` - ImGui frame
    /// * `registry` - Source of buttons, in ascending id order
    /// * `fade` - Whole-frame fade; the menu belongs to the stage and dims
    ///   with it
    pub fn render(ui: &Ui, registry: &SceneRegistry, fade: f32) -> Option<SceneId> {
        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return None;
        }

        let mut clicked = None;
        let _alpha = ui.push_style_var(StyleVar::Alpha(fade.clamp(0.05, 1.0)));

        ui.window("scene-menu")
            .position([display_size[0] * 0.5, 10.0], Condition::Always)
            .position_pivot([0.5, 0.0])
            .size([0.0, 0.0], Condition::Always)
            .no_decoration()
            .bg_alpha(0.7)
            .build(|| {
                ui.text("Welcome to the showroom! Select a scene to explore.");
                ui.spacing();

                for (i, descriptor) in registry.iter().enumerate() {
                    if i > 0 {
                        ui.same_line();
                    }
                    if ui.button(descriptor.display_name) {
                        clicked = Some(descriptor.id);
                    }
                }
            });

        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_swaps_only_after_the_delay() {
        let mut overlay = DescriptionOverlay::new();
        overlay.set_text("drift cars");

        overlay.update(1.0);
        assert_eq!(overlay.text(), "");
        assert_eq!(overlay.alpha(), 0.0);

        overlay.update(0.6);
        assert_eq!(overlay.text(), "drift cars");
    }

    #[test]
    fn alpha_rises_to_one_after_the_swap() {
        let mut overlay = DescriptionOverlay::new();
        overlay.set_text("dirt bikes");
        overlay.update(DESCRIPTION_SWAP_DELAY_SECS + 0.01);

        overlay.update(DESCRIPTION_FADE_SECS / 2.0);
        assert!(overlay.alpha() > 0.0 && overlay.alpha() < 1.0);

        overlay.update(DESCRIPTION_FADE_SECS);
        assert_eq!(overlay.alpha(), 1.0);
    }

    #[test]
    fn new_text_restarts_the_timeline() {
        let mut overlay = DescriptionOverlay::new();
        overlay.set_text("first");
        overlay.update(2.0);
        overlay.update(2.0);
        assert_eq!(overlay.alpha(), 1.0);

        overlay.set_text("second");
        assert_eq!(overlay.alpha(), 0.0);
        overlay.update(0.5);
        assert_eq!(overlay.text(), "first", "swap waits out the delay");
        overlay.update(1.1);
        assert_eq!(overlay.text(), "second");
    }
}
