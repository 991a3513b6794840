//! Dirt track diorama
//!
//! Two dirt bikes working a whooped straight, pitching over the bumps,
//! with dust hanging in the air.

use cgmath::{Deg, Matrix4, Vector3};

use crate::gfx::{
    geometry::{generate_plane, generate_sphere},
    stage::Stage,
};
use crate::scenes::props::{build_bike, place_bike, BikeRig, ParticleField};
use crate::showcase::traits::ShowScene;

const TRACK_HALF_LENGTH: f32 = 20.0;
const WHOOP_SPACING: f32 = 5.0;
const WHOOP_HEIGHT: f32 = 0.8;

struct Rider {
    rig: BikeRig,
    /// Distance along the track, wraps at the ends
    distance: f32,
    speed: f32,
    lane_y: f32,
}

pub struct DirtTrack {
    riders: Vec<Rider>,
    dust: Option<ParticleField>,
}

impl DirtTrack {
    pub fn new() -> Self {
        Self {
            riders: Vec::new(),
            dust: None,
        }
    }

    /// Height of the whoop profile at `x`
    fn terrain_height(x: f32) -> f32 {
        let phase = x * std::f32::consts::TAU / WHOOP_SPACING;
        WHOOP_HEIGHT * 0.5 * (1.0 + phase.sin())
    }

    /// Slope of the whoop profile, for the bike's pitch
    fn terrain_slope(x: f32) -> f32 {
        let phase = x * std::f32::consts::TAU / WHOOP_SPACING;
        WHOOP_HEIGHT * 0.5 * (std::f32::consts::TAU / WHOOP_SPACING) * phase.cos()
    }

    fn pose_rider(stage: &mut Stage, rider: &Rider) {
        let x = -TRACK_HALF_LENGTH + rider.distance.rem_euclid(2.0 * TRACK_HALF_LENGTH);
        let z = Self::terrain_height(x);
        let pitch = Deg(Self::terrain_slope(x).atan().to_degrees());
        place_bike(
            stage,
            &rider.rig,
            Vector3::new(x, rider.lane_y, z),
            Deg(0.0),
            pitch,
        );
    }
}

impl Default for DirtTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowScene for DirtTrack {
    fn initialize(&mut self, stage: &mut Stage) -> anyhow::Result<()> {
        stage.set_backdrop([0.55, 0.45, 0.3]);
        stage.set_ambient([0.4, 0.34, 0.26]);
        stage.set_lighting([-20.0, 30.0, 45.0], [1.0, 0.95, 0.85], 1.3);

        stage.add_material_rgb("hardpack", 0.45, 0.3, 0.18, 0.0, 1.0);
        stage.add_material_rgb("mound clay", 0.5, 0.34, 0.2, 0.0, 1.0);
        stage.add_material_rgb("race yellow", 0.9, 0.75, 0.05, 0.3, 0.5);
        stage.add_material_rgb("race teal", 0.05, 0.6, 0.55, 0.3, 0.5);
        stage.add_material_rgb("knobby rubber", 0.06, 0.06, 0.06, 0.0, 0.95);
        stage.add_material_rgb("dust mote", 0.6, 0.5, 0.36, 0.0, 1.0);

        let ground = generate_plane(70.0, 50.0, 1, 1);
        stage.add_geometry("track floor", &ground, "hardpack");

        // Whoop mounds as half-buried squashed spheres
        let mound = generate_sphere(14, 10);
        let mut x = -TRACK_HALF_LENGTH;
        while x <= TRACK_HALF_LENGTH {
            let index = stage.add_geometry("whoop", &mound, "mound clay");
            if let Some(object) = stage.get_object_mut(index) {
                object.set_matrix(
                    Matrix4::from_translation(Vector3::new(x, 0.0, -0.4))
                        * Matrix4::from_nonuniform_scale(2.6, 6.0, WHOOP_HEIGHT + 0.4),
                );
            }
            x += WHOOP_SPACING;
        }

        for (i, (material, speed, lane_y)) in
            [("race yellow", 7.5, 1.6), ("race teal", 6.8, -1.6)]
                .into_iter()
                .enumerate()
        {
            let rig = build_bike(
                stage,
                &format!("dirt bike {}", i),
                material,
                "knobby rubber",
            );
            let rider = Rider {
                rig,
                distance: i as f32 * 13.0,
                speed,
                lane_y,
            };
            Self::pose_rider(stage, &rider);
            self.riders.push(rider);
        }

        self.dust = Some(ParticleField::scatter(
            stage,
            "dust",
            "dust mote",
            50,
            Vector3::new(-22.0, -8.0, 0.2),
            Vector3::new(22.0, 8.0, 5.0),
            Vector3::new(1.6, 0.3, 0.35),
            0.4,
            0.07,
            23,
        ));

        stage.frame_camera(28.0, 0.4, 1.8, Vector3::new(0.0, 0.0, 1.0));
        Ok(())
    }

    fn update(&mut self, delta_time: f32, stage: &mut Stage) {
        for rider in self.riders.iter_mut() {
            rider.distance += rider.speed * delta_time;
            Self::pose_rider(stage, rider);
        }
        if let Some(dust) = self.dust.as_mut() {
            dust.update(delta_time, stage);
        }
    }

    fn name(&self) -> &str {
        "Dirt Track"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_populates_the_stage() {
        let mut scene = DirtTrack::new();
        let mut stage = Stage::new();
        scene.initialize(&mut stage).unwrap();

        assert_eq!(scene.riders.len(), 2);
        assert!(stage.object_count() > 50);
    }

    #[test]
    fn terrain_profile_repeats_per_whoop() {
        let a = DirtTrack::terrain_height(0.0);
        let b = DirtTrack::terrain_height(WHOOP_SPACING);
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn riders_wrap_around_the_track() {
        let mut scene = DirtTrack::new();
        let mut stage = Stage::new();
        scene.initialize(&mut stage).unwrap();

        for _ in 0..600 {
            scene.update(0.1, &mut stage);
        }
        // Wrapped distance keeps growing; the pose stays on the strip
        let x = -TRACK_HALF_LENGTH
            + scene.riders[0].distance.rem_euclid(2.0 * TRACK_HALF_LENGTH);
        assert!((-TRACK_HALF_LENGTH..=TRACK_HALF_LENGTH).contains(&x));
    }
}
