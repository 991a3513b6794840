//! Grand tourer showroom diorama
//!
//! Three GT cars on slowly rotating display platforms under warm showroom
//! lighting. The centerpiece tries to load an OBJ showpiece from `assets/`
//! and falls back to a procedural car when the file is absent.

use cgmath::{Deg, Matrix4, Vector3};
use log::warn;

use crate::gfx::{
    geometry::{generate_cylinder, generate_plane},
    stage::Stage,
};
use crate::scenes::props::{build_car, place_car, CarRig};
use crate::showcase::traits::ShowScene;

const SHOWPIECE_MODEL: &str = "assets/models/grand_tourer.obj";

/// One display platform and whatever stands on it
struct Display {
    platform: usize,
    position: Vector3<f32>,
    /// Procedural car rig, absent for the loaded showpiece
    rig: Option<CarRig>,
    /// Loaded showpiece object index, if the OBJ import succeeded
    showpiece: Option<usize>,
    angle: f32,
}

pub struct GrandTourer {
    displays: Vec<Display>,
    turntable_speed: f32,
}

impl GrandTourer {
    pub fn new() -> Self {
        Self {
            displays: Vec::new(),
            turntable_speed: 0.3,
        }
    }

    fn pose_display(stage: &mut Stage, display: &Display) {
        if let Some(platform) = stage.get_object_mut(display.platform) {
            platform.set_matrix(
                Matrix4::from_translation(display.position)
                    * Matrix4::from_angle_z(Deg(display.angle.to_degrees())),
            );
        }

        let on_platform = display.position + Vector3::new(0.0, 0.0, 0.5);
        let heading = Deg(display.angle.to_degrees());
        if let Some(rig) = &display.rig {
            place_car(stage, rig, on_platform, heading);
        }
        if let Some(index) = display.showpiece {
            if let Some(object) = stage.get_object_mut(index) {
                object.set_matrix(
                    Matrix4::from_translation(on_platform)
                        * Matrix4::from_angle_z(heading)
                        * Matrix4::from_scale(2.0),
                );
            }
        }
    }
}

impl Default for GrandTourer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowScene for GrandTourer {
    fn initialize(&mut self, stage: &mut Stage) -> anyhow::Result<()> {
        stage.set_backdrop([0.1, 0.08, 0.07]);
        stage.set_ambient([0.32, 0.28, 0.24]);
        stage.set_lighting([10.0, -15.0, 35.0], [1.0, 0.92, 0.8], 1.6);

        stage.add_material_rgb("showroom floor", 0.15, 0.14, 0.13, 0.3, 0.15);
        stage.add_material_rgb("platform brushed", 0.5, 0.5, 0.52, 0.9, 0.35);
        stage.add_material_rgb("silver paint", 0.75, 0.76, 0.78, 0.9, 0.2);
        stage.add_material_rgb("british green", 0.05, 0.25, 0.12, 0.7, 0.25);
        stage.add_material_rgb("sunset orange", 0.85, 0.35, 0.08, 0.7, 0.25);
        stage.add_material_rgb("tire rubber", 0.04, 0.04, 0.04, 0.0, 0.9);

        let floor = generate_plane(60.0, 60.0, 1, 1);
        stage.add_geometry("showroom floor", &floor, "showroom floor");

        let platform_geometry = generate_cylinder(4.5, 0.5, 36);
        let spots = [
            (Vector3::new(0.0, 0.0, 0.25), None),
            (Vector3::new(-11.0, 6.0, 0.25), Some("british green")),
            (Vector3::new(-11.0, -6.0, 0.25), Some("sunset orange")),
        ];

        for (i, (position, paint)) in spots.into_iter().enumerate() {
            let platform = stage.add_geometry(
                &format!("platform {}", i),
                &platform_geometry,
                "platform brushed",
            );

            let (rig, showpiece) = match paint {
                Some(paint) => (
                    Some(build_car(
                        stage,
                        &format!("gt car {}", i),
                        paint,
                        "tire rubber",
                    )),
                    None,
                ),
                // Centerpiece: external showpiece with a procedural fallback
                None => match stage.add_obj_model(SHOWPIECE_MODEL) {
                    Ok(index) => (None, Some(index)),
                    Err(err) => {
                        warn!("showpiece unavailable, using procedural stand-in: {:#}", err);
                        (
                            Some(build_car(stage, "gt centerpiece", "silver paint", "tire rubber")),
                            None,
                        )
                    }
                },
            };

            let display = Display {
                platform,
                position,
                rig,
                showpiece,
                angle: i as f32 * 1.3,
            };
            Self::pose_display(stage, &display);
            self.displays.push(display);
        }

        stage.frame_camera(26.0, 0.35, -0.5, Vector3::new(-4.0, 0.0, 1.0));
        Ok(())
    }

    fn update(&mut self, delta_time: f32, stage: &mut Stage) {
        for display in self.displays.iter_mut() {
            display.angle += self.turntable_speed * delta_time;
            Self::pose_display(stage, display);
        }
    }

    fn render_ui(&mut self, ui: &imgui::Ui) {
        ui.window("Showroom Controls")
            .size([260.0, 90.0], imgui::Condition::FirstUseEver)
            .position([10.0, 10.0], imgui::Condition::FirstUseEver)
            .build(|| {
                ui.slider("Turntable", 0.0, 1.5, &mut self.turntable_speed);
            });
    }

    fn name(&self) -> &str {
        "Grand Tourer Hall"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_builds_three_displays() {
        let mut scene = GrandTourer::new();
        let mut stage = Stage::new();
        scene.initialize(&mut stage).unwrap();

        assert_eq!(scene.displays.len(), 3);
        // floor + 3 platforms + 3 fallback cars of 6 parts (no OBJ assets
        // in the test environment)
        assert_eq!(stage.object_count(), 1 + 3 + 18);
    }

    #[test]
    fn turntables_rotate_over_time() {
        let mut scene = GrandTourer::new();
        let mut stage = Stage::new();
        scene.initialize(&mut stage).unwrap();

        let before = scene.displays[0].angle;
        scene.update(0.5, &mut stage);
        assert!(scene.displays[0].angle > before);
    }
}
