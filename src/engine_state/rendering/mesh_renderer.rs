//! Mesh renderer for the lit cube and voxel terrain.
//!
//! # Architecture
//!
//! The mesh renderer is responsible for:
//! 1. Creating and managing its own render pipeline
//! 2. Owning the scene uniform buffer and its bind group
//! 3. Uploading meshes into named vertex and index buffers
//! 4. Issuing one indexed draw per uploaded mesh

use log::{info, warn};
use wgpu::{BindGroup, Device, RenderPass, RenderPipeline, TextureFormat};

use crate::engine_state::{
    buffer_state::BufferState, scene::SceneUniform, voxels::geometry::GeometryData,
};

use super::{texture, vertex::Vertex};

/// Name of the GPU buffer holding the [`SceneUniform`]
pub const SCENE_UNIFORM_BUFFER: &str = "scene_uniform_buffer";

/// Buffer names for one drawable mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshSlot {
    pub name: &'static str,
    pub vertex_buffer: &'static str,
    pub index_buffer: &'static str,
}

pub const CUBE_MESH: MeshSlot = MeshSlot {
    name: "cube",
    vertex_buffer: "cube_vertex_buffer",
    index_buffer: "cube_index_buffer",
};

pub const CELL_MESH: MeshSlot = MeshSlot {
    name: "cell",
    vertex_buffer: "cell_vertex_buffer",
    index_buffer: "cell_index_buffer",
};

/// Manages lit mesh rendering.
pub struct MeshRenderer {
    /// The WebGPU render pipeline for mesh rendering
    render_pipeline: RenderPipeline,
    /// Binds the scene uniform buffer at group 0
    bind_group: BindGroup,
    /// Uploaded meshes with their index counts
    meshes: Vec<(MeshSlot, u32)>,
}

impl MeshRenderer {
    /// Creates the pipeline and the scene uniform buffer.
    pub fn new(
        device: &Device,
        buffer_state: &mut BufferState,
        texture_format: TextureFormat,
        scene_uniform: &SceneUniform,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("Scene Bind Group Layout"),
        });

        let uniform_buffer = buffer_state.create_buffer_init(
            SCENE_UNIFORM_BUFFER,
            wgpu::util::BufferInitDescriptor {
                label: Some(SCENE_UNIFORM_BUFFER),
                contents: bytemuck::cast_slice(&[*scene_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Scene Bind Group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../assets/shaders/mesh.wgsl").into()),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: texture::Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            render_pipeline,
            bind_group,
            meshes: Vec::new(),
        }
    }

    /// Writes the scene uniform for the next frame.
    pub fn write_uniform(&self, buffer_state: &mut BufferState, scene_uniform: &SceneUniform) {
        buffer_state.write_buffer(
            SCENE_UNIFORM_BUFFER,
            0,
            bytemuck::cast_slice(&[*scene_uniform]),
        );
    }

    /// Uploads `geometry` into `slot`, replacing whatever the slot held.
    ///
    /// Empty geometry clears the slot. Returns whether a mesh is now drawn from it.
    pub fn upload(
        &mut self,
        buffer_state: &mut BufferState,
        slot: MeshSlot,
        geometry: &GeometryData,
    ) -> bool {
        self.meshes.retain(|(existing, _)| *existing != slot);

        if geometry.is_empty() {
            warn!("Skipping upload of empty mesh '{}'", slot.name);
            buffer_state.remove_buffer(slot.vertex_buffer);
            buffer_state.remove_buffer(slot.index_buffer);
            return false;
        }

        let vertices = Vertex::from_geometry(geometry);
        buffer_state.create_buffer_init(
            slot.vertex_buffer,
            wgpu::util::BufferInitDescriptor {
                label: Some(slot.vertex_buffer),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        buffer_state.create_buffer_init(
            slot.index_buffer,
            wgpu::util::BufferInitDescriptor {
                label: Some(slot.index_buffer),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        info!(
            "Uploaded mesh '{}': {} vertices, {} triangles, {} of {} GPU buffer bytes used",
            slot.name,
            vertices.len(),
            geometry.indices.len() / 3,
            buffer_state.get_total_used_memory(),
            buffer_state.get_total_allocated_memory()
        );
        self.meshes.push((slot, geometry.indices.len() as u32));
        true
    }

    /// Draws every uploaded mesh.
    pub fn render(&self, render_pass: &mut RenderPass<'_>, buffer_state: &BufferState) {
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);

        for (slot, index_count) in &self.meshes {
            let (Some(vertex_buffer), Some(index_buffer)) = (
                buffer_state.get_buffer(slot.vertex_buffer),
                buffer_state.get_buffer(slot.index_buffer),
            ) else {
                warn!("Buffers for mesh '{}' are missing", slot.name);
                continue;
            };

            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..*index_count, 0, 0..1);
        }
    }
}
