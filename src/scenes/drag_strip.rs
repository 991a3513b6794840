//! Drag strip diorama
//!
//! Two drag cars launching in staggered runs down a quarter-scale strip,
//! exhaust embers drifting over the start line.

use cgmath::{Deg, Matrix4, Vector3};

use crate::gfx::{geometry::generate_plane, stage::Stage};
use crate::scenes::props::{build_car, place_car, CarRig, ParticleField};
use crate::showcase::traits::ShowScene;

const START_X: f32 = -24.0;
const FINISH_X: f32 = 26.0;
const LAUNCH_ACCEL: f32 = 9.0;
/// Pause at the line between runs, seconds
const STAGING_SECS: f32 = 1.6;

struct Racer {
    rig: CarRig,
    lane_y: f32,
    /// Seconds since this racer's current run started; negative while staged
    run_clock: f32,
}

pub struct DragStrip {
    racers: Vec<Racer>,
    embers: Option<ParticleField>,
}

impl DragStrip {
    pub fn new() -> Self {
        Self {
            racers: Vec::new(),
            embers: None,
        }
    }

    fn pose_racer(stage: &mut Stage, racer: &Racer) {
        let t = racer.run_clock.max(0.0);
        let x = START_X + 0.5 * LAUNCH_ACCEL * t * t;
        place_car(
            stage,
            &racer.rig,
            Vector3::new(x.min(FINISH_X), racer.lane_y, 0.0),
            Deg(0.0),
        );
    }
}

impl Default for DragStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowScene for DragStrip {
    fn initialize(&mut self, stage: &mut Stage) -> anyhow::Result<()> {
        stage.set_backdrop([0.04, 0.03, 0.06]);
        stage.set_ambient([0.18, 0.16, 0.2]);
        stage.set_lighting([0.0, -35.0, 40.0], [1.0, 0.85, 0.7], 1.5);

        stage.add_material_rgb("night asphalt", 0.08, 0.08, 0.09, 0.0, 0.8);
        stage.add_material_rgb("lane paint", 0.8, 0.8, 0.78, 0.0, 0.6);
        stage.add_material_rgb("nitro purple", 0.4, 0.1, 0.55, 0.8, 0.25);
        stage.add_material_rgb("flame gold", 0.85, 0.6, 0.1, 0.8, 0.25);
        stage.add_material_rgb("slick rubber", 0.03, 0.03, 0.03, 0.0, 0.95);
        stage
            .add_material_rgb("ember", 1.0, 0.45, 0.1, 0.0, 1.0)
            .emissive = [0.9, 0.35, 0.05];

        let strip = generate_plane(64.0, 18.0, 1, 1);
        stage.add_geometry("strip", &strip, "night asphalt");

        // Center line divider
        let divider = generate_plane(64.0, 0.4, 1, 1);
        let index = stage.add_geometry("divider", &divider, "lane paint");
        if let Some(object) = stage.get_object_mut(index) {
            object.set_matrix(Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.01)));
        }

        for (i, (material, lane_y, stagger)) in
            [("nitro purple", 3.2, 0.0), ("flame gold", -3.2, -0.35)]
                .into_iter()
                .enumerate()
        {
            let rig = build_car(
                stage,
                &format!("drag car {}", i),
                material,
                "slick rubber",
            );
            let racer = Racer {
                rig,
                lane_y,
                run_clock: stagger,
            };
            Self::pose_racer(stage, &racer);
            self.racers.push(racer);
        }

        self.embers = Some(ParticleField::scatter(
            stage,
            "ember",
            "ember",
            40,
            Vector3::new(START_X - 3.0, -6.0, 0.1),
            Vector3::new(START_X + 6.0, 6.0, 6.0),
            Vector3::new(0.3, 0.0, 1.4),
            0.6,
            0.06,
            31,
        ));

        stage.frame_camera(30.0, 0.38, 2.4, Vector3::new(-6.0, 0.0, 1.0));
        Ok(())
    }

    fn update(&mut self, delta_time: f32, stage: &mut Stage) {
        for racer in self.racers.iter_mut() {
            racer.run_clock += delta_time;

            // Back to staging once the run crosses the finish
            let t = racer.run_clock.max(0.0);
            if START_X + 0.5 * LAUNCH_ACCEL * t * t >= FINISH_X {
                racer.run_clock = -STAGING_SECS;
            }
            Self::pose_racer(stage, racer);
        }
        if let Some(embers) = self.embers.as_mut() {
            embers.update(delta_time, stage);
        }
    }

    fn name(&self) -> &str {
        "Drag Strip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_populates_the_stage() {
        let mut scene = DragStrip::new();
        let mut stage = Stage::new();
        scene.initialize(&mut stage).unwrap();

        assert_eq!(scene.racers.len(), 2);
        // strip + divider + 2 cars of 6 parts + 40 embers
        assert_eq!(stage.object_count(), 2 + 12 + 40);
    }

    #[test]
    fn runs_reset_after_the_finish_line() {
        let mut scene = DragStrip::new();
        let mut stage = Stage::new();
        scene.initialize(&mut stage).unwrap();

        let mut saw_staging = false;
        for _ in 0..300 {
            scene.update(0.1, &mut stage);
            if scene.racers[0].run_clock < 0.0 {
                saw_staging = true;
            }
        }
        assert!(saw_staging, "racer never restaged after a run");
    }
}
