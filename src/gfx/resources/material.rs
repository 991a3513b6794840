//! Material system for the forward renderer
//!
//! Materials are stored centrally in [`MaterialManager`] and objects
//! reference them by id. GPU resources are created lazily and shared by
//! every object using the material.

use std::collections::HashMap;

use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials
///
/// Must match the `MaterialUniform` struct in forward.wgsl exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    _padding: [f32; 2],
    pub emissive: [f32; 3],
    _padding2: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout for the material bind group (slot 2)
pub fn material_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform())
        .create(device, "Material Bind Group Layout")
}

/// Material definition with shading properties
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],

    material_ubo: Option<MaterialUBO>,
    bind_group: Option<wgpu::BindGroup>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
            material_ubo: None,
            bind_group: None,
        }
    }
}

impl Material {
    /// Creates a new material
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            emissive: [0.0, 0.0, 0.0],
            material_ubo: None,
            bind_group: None,
        }
    }

    /// Builder pattern: set emissive color
    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emissive = [r, g, b];
        self
    }

    /// Creates or refreshes this material's GPU resources
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        if self.material_ubo.is_none() {
            self.material_ubo = Some(MaterialUBO::new(device));
        }

        if self.bind_group.is_none() {
            let layout = material_layout(device);
            self.bind_group = Some(
                BindGroupBuilder::new(&layout)
                    .resource(self.material_ubo.as_ref().unwrap().binding_resource())
                    .create(device, "Material Bind Group"),
            );
        }

        let uniform = MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            _padding: [0.0; 2],
            emissive: self.emissive,
            _padding2: 0.0,
        };
        self.material_ubo
            .as_mut()
            .unwrap()
            .update_content(queue, uniform);
    }

    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

/// Centralized material storage
///
/// Always contains a default material used for objects without an explicit
/// assignment or with a dangling id.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material: Material,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    /// Adds a material, replacing any existing one with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Resolves an object's material id, falling back to the default
    pub fn get_material_for_object(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.materials.get(id))
            .unwrap_or(&self.default_material)
    }

    pub fn list_materials(&self) -> Vec<&String> {
        self.materials.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Refreshes GPU resources for the default and every named material
    pub fn update_all_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        self.default_material.update_gpu_resources(device, queue);
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue);
        }
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_material_id_falls_back_to_default() {
        let manager = MaterialManager::new();
        let material = manager.get_material_for_object(Some("missing"));
        assert_eq!(material.name, "Default");
    }

    #[test]
    fn assigned_material_resolves_by_id() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("paint", [1.0, 0.0, 0.0, 1.0], 0.8, 0.3));
        let material = manager.get_material_for_object(Some("paint"));
        assert_eq!(material.name, "paint");
        assert_eq!(material.metallic, 0.8);
    }

    #[test]
    fn clamps_shading_factors() {
        let material = Material::new("hot", [1.0; 4], 2.0, -1.0);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.roughness, 0.0);
    }
}
