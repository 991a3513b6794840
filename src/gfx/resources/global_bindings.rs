//! Global uniform bindings for camera, lighting, and the fade factor
//!
//! One uniform buffer, bound at slot 0 of every pipeline, carries the
//! per-frame state shared by all objects: camera matrices, the scene light,
//! ambient color, and the whole-frame fade applied during scene
//! transitions.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the GlobalUniform struct in forward.wgsl exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    light_position: [f32; 3],
    _padding1: f32,
    light_color: [f32; 3],
    light_intensity: f32,

    ambient_color: [f32; 3],
    /// Whole-frame opacity, 0 = black, 1 = fully lit
    fade: f32,
}
// Total: 16 + 64 + 16 + 16 + 16 = 128 bytes

unsafe impl bytemuck::Pod for GlobalUBOContent {}
unsafe impl bytemuck::Zeroable for GlobalUBOContent {}

/// Scene light configuration
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [15.0, 20.0, 30.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer for the current frame
///
/// # Arguments
/// * `ubo` - The global uniform buffer to update
/// * `queue` - WGPU command queue for buffer updates
/// * `camera` - Updated camera uniform data
/// * `light` - Scene light configuration
/// * `ambient` - Ambient light color
/// * `fade` - Whole-frame fade factor in `[0, 1]`
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: LightConfig,
    ambient: [f32; 3],
    fade: f32,
) {
    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,

        light_position: light.position,
        _padding1: 0.0,
        light_color: light.color,
        light_intensity: light.intensity,

        ambient_color: ambient,
        fade: fade.clamp(0.0, 1.0),
    };

    ubo.update_content(queue, content);
}

/// Manages the bind group for global uniforms (slot 0)
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Creates the layout; the bind group follows once the UBO exists
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    /// Creates the bind group with the provided uniform buffer
    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    /// Returns the bind group layout for pipeline creation
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// Returns the bind group for rendering
    ///
    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}
