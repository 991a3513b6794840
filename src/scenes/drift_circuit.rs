//! Drift circuit diorama
//!
//! Two cars sliding around a snowy circuit, nose pointed into the turn,
//! under a slow fall of snow.

use cgmath::{Deg, Vector3};

use crate::gfx::{geometry::generate_plane, stage::Stage};
use crate::scenes::props::{build_car, place_car, CarRig, ParticleField};
use crate::showcase::traits::ShowScene;

const TRACK_RADIUS: f32 = 11.0;
/// Degrees the chassis points inside the direction of travel
const DRIFT_ANGLE: f32 = 35.0;

struct Drifter {
    rig: CarRig,
    /// Angular position on the circuit, radians
    angle: f32,
    angular_speed: f32,
}

pub struct DriftCircuit {
    drifters: Vec<Drifter>,
    snow: Option<ParticleField>,
}

impl DriftCircuit {
    pub fn new() -> Self {
        Self {
            drifters: Vec::new(),
            snow: None,
        }
    }

    fn pose_drifter(stage: &mut Stage, drifter: &Drifter) {
        let position = Vector3::new(
            TRACK_RADIUS * drifter.angle.cos(),
            TRACK_RADIUS * drifter.angle.sin(),
            0.0,
        );
        // Tangent heading plus the drift offset into the corner
        let heading = Deg(drifter.angle.to_degrees() + 90.0 + DRIFT_ANGLE);
        place_car(stage, &drifter.rig, position, heading);
    }
}

impl Default for DriftCircuit {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowScene for DriftCircuit {
    fn initialize(&mut self, stage: &mut Stage) -> anyhow::Result<()> {
        stage.set_backdrop([0.35, 0.42, 0.55]);
        stage.set_ambient([0.35, 0.38, 0.48]);
        stage.set_lighting([25.0, 50.0, 60.0], [0.87, 0.93, 1.0], 1.4);

        stage.add_material_rgb("packed snow", 0.82, 0.85, 0.9, 0.0, 0.95);
        stage.add_material_rgb("crimson paint", 0.75, 0.08, 0.1, 0.7, 0.3);
        stage.add_material_rgb("midnight paint", 0.12, 0.15, 0.35, 0.7, 0.3);
        stage.add_material_rgb("tire rubber", 0.04, 0.04, 0.04, 0.0, 0.9);
        stage
            .add_material_rgb("snowflake", 0.95, 0.96, 1.0, 0.0, 1.0)
            .emissive = [0.25, 0.25, 0.3];

        let ground = generate_plane(70.0, 70.0, 1, 1);
        stage.add_geometry("circuit", &ground, "packed snow");

        for (i, (material, speed)) in [("crimson paint", 0.55), ("midnight paint", 0.48)]
            .into_iter()
            .enumerate()
        {
            let rig = build_car(
                stage,
                &format!("drift car {}", i),
                material,
                "tire rubber",
            );
            let drifter = Drifter {
                rig,
                angle: i as f32 * std::f32::consts::PI,
                angular_speed: speed,
            };
            Self::pose_drifter(stage, &drifter);
            self.drifters.push(drifter);
        }

        self.snow = Some(ParticleField::scatter(
            stage,
            "snowflake",
            "snowflake",
            80,
            Vector3::new(-25.0, -25.0, 0.0),
            Vector3::new(25.0, 25.0, 22.0),
            Vector3::new(0.4, 0.0, -2.2),
            0.5,
            0.09,
            11,
        ));

        stage.frame_camera(32.0, 0.5, 0.9, Vector3::new(0.0, 0.0, 1.0));
        Ok(())
    }

    fn update(&mut self, delta_time: f32, stage: &mut Stage) {
        for drifter in self.drifters.iter_mut() {
            drifter.angle += drifter.angular_speed * delta_time;
            Self::pose_drifter(stage, drifter);
        }
        if let Some(snow) = self.snow.as_mut() {
            snow.update(delta_time, stage);
        }
    }

    fn name(&self) -> &str {
        "Drift Circuit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_populates_the_stage() {
        let mut scene = DriftCircuit::new();
        let mut stage = Stage::new();
        scene.initialize(&mut stage).unwrap();

        // ground + 2 cars of 6 parts + 80 snowflakes
        assert_eq!(stage.object_count(), 1 + 12 + 80);
        assert!(stage.material_manager.get_material("packed snow").is_some());
    }

    #[test]
    fn cars_move_between_frames() {
        let mut scene = DriftCircuit::new();
        let mut stage = Stage::new();
        scene.initialize(&mut stage).unwrap();

        let before = stage.objects[1].transform;
        scene.update(0.25, &mut stage);
        let after = stage.objects[1].transform;
        assert_ne!(before, after);
    }
}
