use anyhow::Context;
use cgmath::Vector3;
use log::debug;
use wgpu::Device;

use crate::gfx::{
    camera::{
        camera_controller::CameraController, camera_utils::CameraManager,
        orbit_camera::OrbitCamera,
    },
    geometry::GeometryData,
    resources::global_bindings::LightConfig,
    resources::material::{Material, MaterialManager},
    stage::object::Mesh,
};

use super::object::Object;

/// Camera framing a scene can return to (the `r` key)
#[derive(Debug, Clone, Copy)]
pub struct CameraHome {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
}

impl Default for CameraHome {
    fn default() -> Self {
        Self {
            distance: 18.0,
            pitch: 0.45,
            yaw: 0.8,
            target: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// The container scene content is staged in
///
/// Holds objects, materials, lighting, and the camera. Scenes populate it
/// in `initialize` and the director clears it between scenes; everything
/// except the camera rig is per-scene state.
pub struct Stage {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
    /// Key light for the resident scene
    pub light: LightConfig,
    /// Ambient light color
    pub ambient: [f32; 3],
    /// Clear color behind the scene, the skybox stand-in
    pub backdrop: [f32; 3],
    camera_home: CameraHome,
}

impl Stage {
    /// Creates an empty stage with the default camera rig
    pub fn new() -> Self {
        let home = CameraHome::default();
        let mut camera = OrbitCamera::new(home.distance, home.pitch, home.yaw, home.target, 1.5);
        camera.bounds.min_distance = Some(2.0);
        let controller = CameraController::new(0.005, 0.1);

        Self {
            camera_manager: CameraManager::new(camera, controller),
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            light: LightConfig::default(),
            ambient: [0.25, 0.25, 0.3],
            backdrop: [0.05, 0.06, 0.09],
            camera_home: home,
        }
    }

    /// Updates per-frame camera state
    pub fn update(&mut self) {
        self.camera_manager.camera.update();
    }

    /// Drops every object and scene material
    ///
    /// Dropping the objects releases their GPU buffers. Lighting and
    /// backdrop return to defaults; the camera rig survives so the next
    /// scene can re-frame it.
    pub fn clear(&mut self) {
        let dropped = self.objects.len();
        self.objects.clear();
        self.material_manager = MaterialManager::new();
        self.light = LightConfig::default();
        self.ambient = [0.25, 0.25, 0.3];
        self.backdrop = [0.05, 0.06, 0.09];
        if dropped > 0 {
            debug!("stage cleared, {} objects released", dropped);
        }
    }

    /// Adds an object built from generated primitive geometry
    ///
    /// # Arguments
    /// * `name` - Object name, made unique if already taken
    /// * `geometry` - Generated primitive data
    /// * `material_id` - Material to shade the object with
    ///
    /// # Returns
    /// Index of the new object for later transform updates
    pub fn add_geometry(
        &mut self,
        name: &str,
        geometry: &GeometryData,
        material_id: &str,
    ) -> usize {
        let name = self.ensure_unique_name(name);
        let mut object = Object::new(name, vec![Mesh::from_geometry(geometry)]);
        object.set_material(material_id);
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Loads a 3D object from an OBJ file with automatic material extraction
    ///
    /// Loads geometry and materials from the OBJ/MTL pair and assigns
    /// materials based on the ids in the OBJ file.
    ///
    /// # Errors
    /// Fails when the file is missing or malformed; callers are expected to
    /// fall back to procedural stand-ins.
    pub fn add_obj_model(&mut self, object_path: &str) -> anyhow::Result<usize> {
        let (models, materials) = tobj::load_obj(
            object_path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .with_context(|| format!("failed to load OBJ file {}", object_path))?;

        let materials = materials.unwrap_or_default();

        for (i, mtl) in materials.iter().enumerate() {
            let material_name = if mtl.name.is_empty() {
                format!("material_{}", i)
            } else {
                mtl.name.clone()
            };

            if self.material_manager.get_material(&material_name).is_some() {
                continue;
            }

            let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
            let material = Material::new(
                &material_name,
                [
                    diffuse[0],
                    diffuse[1],
                    diffuse[2],
                    mtl.dissolve.unwrap_or(1.0),
                ],
                0.0,
                1.0 - (mtl.shininess.unwrap_or(32.0) / 128.0).clamp(0.0, 1.0),
            );

            self.material_manager.add_material(material);
        }

        let mut meshes = Vec::new();
        for m in models.iter() {
            let mesh = &m.mesh;

            let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len()
            {
                mesh.normals.clone()
            } else {
                Mesh::calculate_face_normals(&mesh.positions, &mesh.indices)
            };

            meshes.push(Mesh::new(
                mesh.positions.clone(),
                normals,
                mesh.indices.clone(),
            ));
        }

        let default_name = object_path.to_string();
        let name = models
            .first()
            .filter(|m| !m.name.is_empty())
            .map(|m| m.name.clone())
            .unwrap_or(default_name);
        let name = self.ensure_unique_name(&name);
        let mut object = Object::new(name, meshes);

        if let Some(first_model) = models.first() {
            if let Some(material_id) = first_model.mesh.material_id {
                if material_id < materials.len() {
                    let material_name = if materials[material_id].name.is_empty() {
                        format!("material_{}", material_id)
                    } else {
                        materials[material_id].name.clone()
                    };
                    object.set_material(&material_name);
                }
            }
        }

        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }

    /// Creates a material and registers it with the manager
    pub fn add_material(
        &mut self,
        name: &str,
        base_color: [f32; 4],
        metallic: f32,
        roughness: f32,
    ) -> &mut Material {
        let material = Material::new(name, base_color, metallic, roughness);
        self.material_manager.add_material(material);
        self.material_manager.get_material_mut(name).unwrap()
    }

    /// Convenience method for creating materials from RGB components
    pub fn add_material_rgb(
        &mut self,
        name: &str,
        r: f32,
        g: f32,
        b: f32,
        metallic: f32,
        roughness: f32,
    ) -> &mut Material {
        self.add_material(name, [r, g, b, 1.0], metallic, roughness)
    }

    /// Sets the key light
    pub fn set_lighting(&mut self, position: [f32; 3], color: [f32; 3], intensity: f32) {
        self.light = LightConfig {
            position,
            color,
            intensity,
        };
    }

    /// Sets the ambient light color
    pub fn set_ambient(&mut self, ambient: [f32; 3]) {
        self.ambient = ambient;
    }

    /// Sets the clear color behind the scene
    pub fn set_backdrop(&mut self, backdrop: [f32; 3]) {
        self.backdrop = backdrop;
    }

    /// Frames the camera and records the framing as home
    ///
    /// Scenes call this from `initialize`; `recall_camera` (the `r` key)
    /// returns to the most recent framing.
    pub fn frame_camera(&mut self, distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>) {
        self.camera_home = CameraHome {
            distance,
            pitch,
            yaw,
            target,
        };
        self.camera_manager
            .camera
            .set_framing(distance, pitch, yaw, target);
    }

    /// Returns the camera to the scene's home framing
    pub fn recall_camera(&mut self) {
        let home = self.camera_home;
        self.camera_manager
            .camera
            .set_framing(home.distance, home.pitch, home.yaw, home.target);
    }

    /// Initializes GPU resources for objects and materials that lack them
    ///
    /// Safe to call every frame; objects added since the last call get
    /// their buffers here.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for object in self.objects.iter_mut() {
            if object.gpu_resources.is_none() {
                object.init_gpu_resources(device);
            }
        }
        self.material_manager
            .update_all_gpu_resources(device, queue);
    }

    /// Syncs every initialized object's transform to the GPU
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for object in &self.objects {
            if object.gpu_resources.is_some() {
                object.update_transform(queue);
            }
        }
    }

    /// Gets mutable reference to an object by index
    pub fn get_object_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.objects.get_mut(index)
    }

    /// Gets immutable reference to an object by index
    pub fn get_object(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    /// Gets the total number of objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Total triangles across all resident objects
    pub fn triangle_count(&self) -> u32 {
        self.objects
            .iter()
            .map(|obj| obj.meshes.iter().map(|m| m.index_count() / 3).sum::<u32>())
            .sum()
    }

    fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;

    #[test]
    fn clear_empties_objects_and_materials() {
        let mut stage = Stage::new();
        stage.add_material_rgb("paint", 1.0, 0.2, 0.2, 0.5, 0.4);
        stage.add_geometry("crate", &generate_cube(), "paint");
        assert_eq!(stage.object_count(), 1);
        assert_eq!(stage.material_manager.len(), 1);

        stage.clear();
        assert_eq!(stage.object_count(), 0);
        assert!(stage.material_manager.is_empty());
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let mut stage = Stage::new();
        let cube = generate_cube();
        stage.add_geometry("wheel", &cube, "paint");
        stage.add_geometry("wheel", &cube, "paint");
        assert_eq!(stage.objects[0].name, "wheel");
        assert_eq!(stage.objects[1].name, "wheel (1)");
    }

    #[test]
    fn missing_obj_file_is_an_error_not_a_panic() {
        let mut stage = Stage::new();
        let result = stage.add_obj_model("assets/models/definitely-missing.obj");
        assert!(result.is_err());
        assert_eq!(stage.object_count(), 0);
    }

    #[test]
    fn recall_returns_to_scene_framing() {
        let mut stage = Stage::new();
        stage.frame_camera(25.0, 0.6, 1.0, Vector3::new(1.0, 2.0, 0.0));
        stage.camera_manager.camera.add_yaw(1.5);
        stage.camera_manager.camera.add_distance(4.0);

        stage.recall_camera();
        assert!((stage.camera_manager.camera.distance - 25.0).abs() < 1e-5);
        assert!((stage.camera_manager.camera.yaw - 1.0).abs() < 1e-5);
    }
}
