//! # Stock Scenes
//!
//! The four vehicle dioramas the showroom ships with, plus the shared
//! props they are assembled from. [`default_registry`] wires them into a
//! registry the app hands to the lifecycle director.

pub mod dirt_track;
pub mod drag_strip;
pub mod drift_circuit;
pub mod grand_tourer;
pub mod props;

use std::path::PathBuf;

use crate::showcase::registry::{SceneDescriptor, SceneId, SceneRegistry};

pub use dirt_track::DirtTrack;
pub use drag_strip::DragStrip;
pub use drift_circuit::DriftCircuit;
pub use grand_tourer::GrandTourer;

/// Builds the registry of stock scenes
pub fn default_registry() -> SceneRegistry {
    let mut registry = SceneRegistry::new();

    registry.register(SceneDescriptor {
        id: SceneId(1),
        display_name: "Drift Cars",
        description: "Drift cars are specially modified vehicles designed for \
            controlled sliding around corners at high speeds. Built for precision \
            and handling, they feature upgraded suspension, tires, and power \
            delivery systems.",
        audio: Some(PathBuf::from("assets/sound/drift_circuit.ogg")),
        build: Box::new(|| Box::new(DriftCircuit::new())),
    });

    registry.register(SceneDescriptor {
        id: SceneId(2),
        display_name: "Grand Tourer Cars",
        description: "Grand Tourer (GT) cars are high-performance vehicles designed \
            for long-distance driving with a focus on comfort, style, and speed. \
            Combining luxury with athleticism, they often feature powerful engines, \
            refined interiors, and advanced technology.",
        audio: Some(PathBuf::from("assets/sound/grand_tourer.ogg")),
        build: Box::new(|| Box::new(GrandTourer::new())),
    });

    registry.register(SceneDescriptor {
        id: SceneId(3),
        display_name: "Dirt Bikes",
        description: "Dirt bikes are lightweight motorcycles designed for off-road \
            riding on rough terrains like dirt trails, mud, and sand. Built for \
            durability and agility, they feature knobby tires, long suspension \
            travel, and high ground clearance.",
        audio: Some(PathBuf::from("assets/sound/dirt_track.ogg")),
        build: Box::new(|| Box::new(DirtTrack::new())),
    });

    registry.register(SceneDescriptor {
        id: SceneId(4),
        display_name: "Drag Cars",
        description: "Drag cars are high-performance vehicles built for \
            straight-line racing, typically over a quarter-mile distance. They are \
            designed for maximum speed and acceleration, featuring powerful \
            engines, lightweight frames, and specialized tires.",
        audio: Some(PathBuf::from("assets/sound/drag_strip.ogg")),
        build: Box::new(|| Box::new(DragStrip::new())),
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::stage::Stage;

    #[test]
    fn registry_ships_four_scenes_with_audio() {
        let registry = default_registry();
        assert_eq!(registry.len(), 4);

        for descriptor in registry.iter() {
            assert!(descriptor.audio.is_some());
            assert!(!descriptor.display_name.is_empty());
            assert!(!descriptor.description.is_empty());
        }

        let ids: Vec<u32> = registry.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn every_stock_scene_initializes_and_updates() {
        let registry = default_registry();
        for descriptor in registry.iter() {
            let mut stage = Stage::new();
            let mut scene = (descriptor.build)();

            scene
                .initialize(&mut stage)
                .unwrap_or_else(|err| panic!("{} failed to initialize: {}", scene.name(), err));
            assert!(
                stage.object_count() > 0,
                "{} left the stage empty",
                scene.name()
            );

            scene.update(0.1, &mut stage);
            scene.dispose(&mut stage).unwrap();
        }
    }
}
