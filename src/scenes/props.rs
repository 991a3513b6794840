//! Shared diorama props
//!
//! Vehicle rigs assembled from procedural primitives and a simple particle
//! field. Rigs keep the object indices of their parts so scenes can pose
//! the whole vehicle each frame with one call.
//!
//! Vehicle local frame: forward is +X, left is +Y, up is +Z.

use cgmath::{Deg, Matrix4, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::gfx::{
    geometry::{generate_cube, generate_cylinder, generate_sphere},
    stage::Stage,
};

/// Wheel mount points for the car rig
const CAR_WHEEL_OFFSETS: [[f32; 3]; 4] = [
    [1.4, 1.05, 0.45],
    [1.4, -1.05, 0.45],
    [-1.4, 1.05, 0.45],
    [-1.4, -1.05, 0.45],
];

/// A car assembled from a body, cabin, and four wheels
pub struct CarRig {
    body: usize,
    cabin: usize,
    wheels: [usize; 4],
}

/// Builds a car at the origin
///
/// # Arguments
/// * `stage` - Stage to add the parts to
/// * `name` - Prefix for the part object names
/// * `body_material` - Material for body and cabin
/// * `wheel_material` - Material for the wheels
pub fn build_car(
    stage: &mut Stage,
    name: &str,
    body_material: &str,
    wheel_material: &str,
) -> CarRig {
    let cube = generate_cube();
    let wheel = generate_cylinder(0.45, 0.3, 16);

    let body = stage.add_geometry(&format!("{} body", name), &cube, body_material);
    let cabin = stage.add_geometry(&format!("{} cabin", name), &cube, body_material);
    let wheels = [0, 1, 2, 3].map(|i| {
        stage.add_geometry(&format!("{} wheel {}", name, i), &wheel, wheel_material)
    });

    let rig = CarRig {
        body,
        cabin,
        wheels,
    };
    place_car(stage, &rig, Vector3::new(0.0, 0.0, 0.0), Deg(0.0));
    rig
}

/// Poses every part of a car rig
///
/// # Arguments
/// * `position` - Ground-contact point of the chassis center
/// * `heading` - Rotation about Z; 0 faces +X
pub fn place_car(stage: &mut Stage, rig: &CarRig, position: Vector3<f32>, heading: Deg<f32>) {
    let base = Matrix4::from_translation(position) * Matrix4::from_angle_z(heading);

    if let Some(body) = stage.get_object_mut(rig.body) {
        body.set_matrix(
            base * Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.75))
                * Matrix4::from_nonuniform_scale(4.2, 1.9, 0.9),
        );
    }
    if let Some(cabin) = stage.get_object_mut(rig.cabin) {
        cabin.set_matrix(
            base * Matrix4::from_translation(Vector3::new(-0.3, 0.0, 1.5))
                * Matrix4::from_nonuniform_scale(2.0, 1.7, 0.7),
        );
    }
    for (offset, &index) in CAR_WHEEL_OFFSETS.iter().zip(rig.wheels.iter()) {
        if let Some(wheel) = stage.get_object_mut(index) {
            // Wheel cylinders extend along Z; stand them on the lateral axis
            wheel.set_matrix(
                base * Matrix4::from_translation(Vector3::new(offset[0], offset[1], offset[2]))
                    * Matrix4::from_angle_x(Deg(90.0)),
            );
        }
    }
}

/// A dirt bike assembled from a frame and two wheels
pub struct BikeRig {
    frame: usize,
    wheels: [usize; 2],
}

/// Builds a bike at the origin
pub fn build_bike(
    stage: &mut Stage,
    name: &str,
    frame_material: &str,
    wheel_material: &str,
) -> BikeRig {
    let cube = generate_cube();
    let wheel = generate_cylinder(0.35, 0.12, 14);

    let frame = stage.add_geometry(&format!("{} frame", name), &cube, frame_material);
    let wheels = [0, 1]
        .map(|i| stage.add_geometry(&format!("{} wheel {}", name, i), &wheel, wheel_material));

    let rig = BikeRig { frame, wheels };
    place_bike(stage, &rig, Vector3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
    rig
}

/// Poses every part of a bike rig
///
/// # Arguments
/// * `position` - Ground-contact point under the frame center
/// * `heading` - Rotation about Z; 0 faces +X
/// * `pitch` - Nose-up rotation for jumps and whoops
pub fn place_bike(
    stage: &mut Stage,
    rig: &BikeRig,
    position: Vector3<f32>,
    heading: Deg<f32>,
    pitch: Deg<f32>,
) {
    let base = Matrix4::from_translation(position)
        * Matrix4::from_angle_z(heading)
        * Matrix4::from_angle_y(-pitch);

    if let Some(frame) = stage.get_object_mut(rig.frame) {
        frame.set_matrix(
            base * Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.85))
                * Matrix4::from_nonuniform_scale(1.8, 0.35, 0.6),
        );
    }
    for (i, &index) in rig.wheels.iter().enumerate() {
        let x = if i == 0 { 0.75 } else { -0.75 };
        if let Some(wheel) = stage.get_object_mut(index) {
            wheel.set_matrix(
                base * Matrix4::from_translation(Vector3::new(x, 0.0, 0.35))
                    * Matrix4::from_angle_x(Deg(90.0)),
            );
        }
    }
}

/// A box-bounded cloud of drifting particles
///
/// Particles move with a constant per-particle velocity and wrap around
/// the bounds, which is enough for snow, dust, and embers at diorama
/// scale.
pub struct ParticleField {
    indices: Vec<usize>,
    positions: Vec<Vector3<f32>>,
    velocities: Vec<Vector3<f32>>,
    bounds_min: Vector3<f32>,
    bounds_max: Vector3<f32>,
    size: f32,
}

impl ParticleField {
    /// Scatters `count` particles uniformly inside the bounds
    ///
    /// # Arguments
    /// * `name` - Prefix for particle object names
    /// * `material` - Material shared by every particle
    /// * `base_velocity` - Common drift direction
    /// * `jitter` - Per-particle random velocity spread
    /// * `size` - Particle radius
    /// * `seed` - Deterministic scatter seed
    #[allow(clippy::too_many_arguments)]
    pub fn scatter(
        stage: &mut Stage,
        name: &str,
        material: &str,
        count: usize,
        bounds_min: Vector3<f32>,
        bounds_max: Vector3<f32>,
        base_velocity: Vector3<f32>,
        jitter: f32,
        size: f32,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sphere = generate_sphere(6, 4);

        let mut indices = Vec::with_capacity(count);
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);

        for i in 0..count {
            let position = Vector3::new(
                rng.random_range(bounds_min.x..bounds_max.x),
                rng.random_range(bounds_min.y..bounds_max.y),
                rng.random_range(bounds_min.z..bounds_max.z),
            );
            let velocity = base_velocity
                + Vector3::new(
                    rng.random_range(-jitter..jitter),
                    rng.random_range(-jitter..jitter),
                    rng.random_range(-jitter..jitter),
                );

            let index = stage.add_geometry(&format!("{} {}", name, i), &sphere, material);
            if let Some(object) = stage.get_object_mut(index) {
                object.set_matrix(
                    Matrix4::from_translation(position) * Matrix4::from_scale(size),
                );
            }

            indices.push(index);
            positions.push(position);
            velocities.push(velocity);
        }

        Self {
            indices,
            positions,
            velocities,
            bounds_min,
            bounds_max,
            size,
        }
    }

    /// Moves every particle and wraps it inside the bounds
    pub fn update(&mut self, delta_time: f32, stage: &mut Stage) {
        let extent = self.bounds_max - self.bounds_min;

        for ((index, position), velocity) in self
            .indices
            .iter()
            .zip(self.positions.iter_mut())
            .zip(self.velocities.iter())
        {
            *position += *velocity * delta_time;

            for axis in 0..3 {
                if position[axis] < self.bounds_min[axis] {
                    position[axis] += extent[axis];
                } else if position[axis] > self.bounds_max[axis] {
                    position[axis] -= extent[axis];
                }
            }

            if let Some(object) = stage.get_object_mut(*index) {
                object.set_matrix(
                    Matrix4::from_translation(*position) * Matrix4::from_scale(self.size),
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_rig_adds_six_parts() {
        let mut stage = Stage::new();
        stage.add_material_rgb("paint", 0.8, 0.1, 0.1, 0.6, 0.3);
        stage.add_material_rgb("rubber", 0.05, 0.05, 0.05, 0.0, 0.9);
        build_car(&mut stage, "test car", "paint", "rubber");
        assert_eq!(stage.object_count(), 6);
    }

    #[test]
    fn particles_stay_inside_bounds() {
        let mut stage = Stage::new();
        stage.add_material_rgb("snow", 1.0, 1.0, 1.0, 0.0, 1.0);
        let min = Vector3::new(-5.0, -5.0, 0.0);
        let max = Vector3::new(5.0, 5.0, 10.0);
        let mut field = ParticleField::scatter(
            &mut stage,
            "flake",
            "snow",
            24,
            min,
            max,
            Vector3::new(0.0, 0.0, -3.0),
            0.5,
            0.08,
            7,
        );
        assert_eq!(field.len(), 24);

        for _ in 0..200 {
            field.update(0.1, &mut stage);
        }
        for position in &field.positions {
            assert!(position.z >= min.z - 1.0 && position.z <= max.z + 1.0);
        }
    }

    #[test]
    fn scatter_is_deterministic_for_a_seed() {
        let mut stage_a = Stage::new();
        let mut stage_b = Stage::new();
        for stage in [&mut stage_a, &mut stage_b] {
            stage.add_material_rgb("dust", 0.5, 0.4, 0.3, 0.0, 1.0);
        }
        let min = Vector3::new(-1.0, -1.0, 0.0);
        let max = Vector3::new(1.0, 1.0, 2.0);
        let field_a = ParticleField::scatter(
            &mut stage_a,
            "p",
            "dust",
            8,
            min,
            max,
            Vector3::new(0.0, 0.0, 0.0),
            0.1,
            0.05,
            42,
        );
        let field_b = ParticleField::scatter(
            &mut stage_b,
            "p",
            "dust",
            8,
            min,
            max,
            Vector3::new(0.0, 0.0, 0.0),
            0.1,
            0.05,
            42,
        );
        assert_eq!(field_a.positions, field_b.positions);
    }
}
