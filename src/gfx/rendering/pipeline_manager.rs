//! Render pipeline management
//!
//! Caches shader modules and pipelines by name so pipeline creation stays
//! declarative at the render engine level.

use std::collections::HashMap;

use wgpu::*;

use crate::gfx::stage::vertex::Vertex3D;

/// Configuration for creating a render pipeline
#[derive(Debug)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub color_format: TextureFormat,
}

impl PipelineConfig {
    /// Creates a config for the given shader and color target
    pub fn new(shader: &str, color_format: TextureFormat) -> Self {
        Self {
            label: format!("{} Pipeline", shader),
            shader: shader.to_string(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(Face::Back),
            depth_format: None,
            color_format,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Enables depth testing against the given format
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }
}

/// Caches shaders and pipelines by name
pub struct PipelineManager {
    shaders: HashMap<String, ShaderModule>,
    pipelines: HashMap<String, RenderPipeline>,
}

impl PipelineManager {
    pub fn new() -> Self {
        Self {
            shaders: HashMap::new(),
            pipelines: HashMap::new(),
        }
    }

    /// Compiles and stores a WGSL shader under `name`
    pub fn load_shader(&mut self, device: &Device, name: &str, source: &str) {
        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shaders.insert(name.to_string(), module);
    }

    /// Creates and caches a pipeline under `name`
    ///
    /// The config's shader must expose `vs_main` and `fs_main` entry
    /// points and consume [`Vertex3D`] vertices.
    ///
    /// # Panics
    /// Panics if the config references a shader that was never loaded.
    pub fn create_pipeline(&mut self, device: &Device, name: &str, config: PipelineConfig) {
        let shader = self
            .shaders
            .get(&config.shader)
            .unwrap_or_else(|| panic!("shader '{}' not loaded", config.shader));

        let layout_refs: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", config.label)),
            bind_group_layouts: &layout_refs,
            push_constant_ranges: &[],
        });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: config.color_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        self.pipelines.insert(name.to_string(), pipeline);
    }

    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }
}

impl Default for PipelineManager {
    fn default() -> Self {
        Self::new()
    }
}
