//! Rendering system for the demos.
//!
//! This module owns the surface and every GPU resource drawn into it. A frame is a
//! single render pass: clear to the background colour (or draw the background
//! image), then draw the lit meshes against a depth buffer.

use image::RgbaImage;
use log::{debug, error, warn};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::dpi::PhysicalSize;

use crate::config::Rgb;

use super::{
    buffer_state::BufferState,
    scene::SceneUniform,
    voxels::{geometry::GeometryData, tasks::CellMeshSink},
};

pub mod background;
pub mod mesh_renderer;
pub mod texture;
pub mod vertex;

use background::BackgroundRenderer;
use mesh_renderer::{MeshRenderer, MeshSlot, CELL_MESH};

// Re-export commonly used types
pub use vertex::Vertex;

/// Outcome of a call to [`SceneRenderer::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The frame was submitted and presented
    Presented,
    /// No frame was drawn; render again once the surface recovers
    Skipped,
}

/// Manages the surface and the renderers drawing into it.
pub struct SceneRenderer {
    /// The WebGPU surface being rendered to
    surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    /// Registry of all named GPU buffers
    buffer_state: BufferState,
    depth_texture: texture::Texture,
    mesh_renderer: MeshRenderer,
    background: Option<BackgroundRenderer>,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    /// Creates every pipeline the scene needs.
    ///
    /// When `background_image` is given it is drawn behind the meshes, otherwise the
    /// frame is cleared to `clear_color`.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        scene_uniform: &SceneUniform,
        clear_color: Rgb,
        background_image: Option<&RgbaImage>,
    ) -> Self {
        let mut buffer_state = BufferState::new(device.clone(), queue.clone());
        let depth_texture =
            texture::Texture::create_depth_texture(&device, &surface_config, "Depth Texture");
        let mesh_renderer = MeshRenderer::new(
            &device,
            &mut buffer_state,
            surface_config.format,
            scene_uniform,
        );
        let background = background_image
            .map(|image| BackgroundRenderer::new(&device, &queue, surface_config.format, image));

        Self {
            surface,
            surface_config,
            device,
            queue,
            buffer_state,
            depth_texture,
            mesh_renderer,
            background,
            clear_color: clear_color.to_wgpu(),
        }
    }

    pub fn surface_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.surface_config.width, self.surface_config.height)
    }

    /// Reconfigures the surface and depth buffer. Zero sized windows are ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> bool {
        if size.width == 0 || size.height == 0 {
            debug!("Ignoring resize to {}x{}", size.width, size.height);
            return false;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.reconfigure();
        true
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            &self.surface_config,
            "Depth Texture",
        );
    }

    /// Uploads a mesh into `slot`. Returns whether anything will be drawn from it.
    pub fn upload_geometry(&mut self, slot: MeshSlot, geometry: &GeometryData) -> bool {
        self.mesh_renderer
            .upload(&mut self.buffer_state, slot, geometry)
    }

    /// Renders a frame with the given scene uniform.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&mut self, scene_uniform: &SceneUniform) -> FrameStatus {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return FrameStatus::Skipped;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
                return FrameStatus::Skipped;
            }
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                return FrameStatus::Skipped;
            }
        };

        self.mesh_renderer
            .write_uniform(&mut self.buffer_state, scene_uniform);

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(background) = &self.background {
                background.render(&mut rpass);
            }
            self.mesh_renderer.render(&mut rpass, &self.buffer_state);
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
        FrameStatus::Presented
    }
}

impl CellMeshSink for SceneRenderer {
    fn accept_cell_mesh(&mut self, geometry: GeometryData) {
        self.upload_geometry(CELL_MESH, &geometry);
    }
}
