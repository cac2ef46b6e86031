//! # Engine State Module
//!
//! Owns everything a running demo needs once the window and GPU exist.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for a running demo
//! * `buffer_state` - Manages GPU buffers for rendering
//! * `camera_state` - Camera, projection and orbit controls
//! * `rendering` - Surface, pipelines and the frame loop
//! * `render_schedule` - Continuous or on-demand redraws
//! * `scene` - Materials, lights and the cube
//! * `task_management` - Worker threads for terrain generation
//! * `voxels` - Noise, voxel storage, terrain fill and meshing
//!
//! The cube demo redraws continuously with a fixed camera. The terrain viewer
//! generates its cell on a worker, then redraws only when the camera moves, the
//! window resizes or the mesh arrives.

use cgmath::Point3;
use image::RgbaImage;
use log::info;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{dpi::PhysicalSize, event::MouseButton, keyboard::KeyCode};

use camera_state::{
    camera::{Camera, Projection},
    CameraState,
};
use render_schedule::{RenderMode, RenderScheduler};
use rendering::{mesh_renderer::CUBE_MESH, FrameStatus, SceneRenderer};
use scene::{
    cube::{box_geometry, CubeScene},
    lights::DirectionalLight,
    Material, SceneUniform,
};
use task_management::TaskManager;
use voxels::tasks::cell_generation_task::CellGenerationTask;

use crate::{
    application_state::input_state::ProcessedInputState,
    config::{DemoConfig, DemoKind},
};

pub mod buffer_state;
pub mod camera_state;
pub mod render_schedule;
pub mod rendering;
pub mod scene;
pub mod task_management;
pub mod voxels;

/// Camera operations requested by the user since the last loop iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewerAction {
    /// Left drag in pixels
    pub rotate: Option<(f32, f32)>,
    /// Right drag in pixels
    pub pan: Option<(f32, f32)>,
    /// Signed wheel events, positive towards the target
    pub zoom_notches: i32,
    /// `R` was pressed
    pub reset: bool,
}

impl ViewerAction {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Maps raw input to camera operations.
pub fn translate_processed_input(input: &ProcessedInputState) -> ViewerAction {
    let drag = input.cursor_delta.map(|(dx, dy)| (dx as f32, dy as f32));
    let left = input.get_mouse_button_state(MouseButton::Left).is_active();
    let right = input.get_mouse_button_state(MouseButton::Right).is_active();

    ViewerAction {
        rotate: drag.filter(|_| left),
        pan: drag.filter(|_| right && !left),
        zoom_notches: input.wheel_notches,
        reset: input.get_key_state(KeyCode::KeyR).is_just_pressed(),
    }
}

/// The main state container for a running demo.
pub struct EngineState {
    pub camera_state: CameraState,
    pub render_scheduler: RenderScheduler,
    renderer: SceneRenderer,
    task_manager: TaskManager<SceneRenderer>,
    scene_uniform: SceneUniform,
    /// Present for the spinning cube demo
    cube: Option<CubeScene>,
    viewer_actions: ViewerAction,
    start_time: web_time::Instant,
}

impl EngineState {
    /// Builds the selected demo and starts any background generation it needs.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        config: &DemoConfig,
        background_image: Option<RgbaImage>,
    ) -> Self {
        let (width, height) = (surface_config.width, surface_config.height);

        match config.demo {
            DemoKind::Cube => {
                let cube_config = &config.cube;
                let material = Material::phong(
                    cube_config.color,
                    cube_config.specular,
                    cube_config.shininess,
                );
                let lights = [DirectionalLight::from(&cube_config.light)];
                let scene_uniform = SceneUniform::new(&material, &lights);
                let camera_state = CameraState::fixed(
                    Camera::new(
                        Point3::new(0.0, 0.0, cube_config.camera_distance),
                        Point3::new(0.0, 0.0, 0.0),
                    ),
                    Projection::from_config(width, height, &cube_config.camera),
                );

                let mut state = Self::assemble(
                    SceneRenderer::new(
                        surface,
                        surface_config,
                        device,
                        queue,
                        &scene_uniform,
                        cube_config.background,
                        None,
                    ),
                    camera_state,
                    scene_uniform,
                    RenderMode::Continuous,
                    0,
                );
                let [w, h, d] = cube_config.size;
                state.renderer.upload_geometry(CUBE_MESH, &box_geometry(w, h, d));
                state.cube = Some(CubeScene::new(cube_config));
                state
            }
            DemoKind::Voxels => {
                let voxels_config = &config.voxels;
                let material = Material::lambert(voxels_config.color);
                let lights: Vec<DirectionalLight> =
                    voxels_config.lights.iter().map(DirectionalLight::from).collect();
                let scene_uniform = SceneUniform::new(&material, &lights);

                let cell = voxels_config.cell_size as f32;
                let scale = |p: [f32; 3]| Point3::new(p[0] * cell, p[1] * cell, p[2] * cell);
                let camera_state = CameraState::orbiting(
                    scale(voxels_config.camera_position),
                    scale(voxels_config.orbit_target),
                    Projection::from_config(width, height, &voxels_config.camera),
                );

                let mut state = Self::assemble(
                    SceneRenderer::new(
                        surface,
                        surface_config,
                        device,
                        queue,
                        &scene_uniform,
                        voxels_config.background.clear_color(),
                        background_image.as_ref(),
                    ),
                    camera_state,
                    scene_uniform,
                    RenderMode::OnDemand,
                    1,
                );

                info!(
                    "Generating a {0}x{0}x{0} cell in the background",
                    voxels_config.cell_size
                );
                state
                    .task_manager
                    .publish_task(Box::new(CellGenerationTask::new(voxels_config)));
                state
            }
        }
    }

    fn assemble(
        renderer: SceneRenderer,
        camera_state: CameraState,
        scene_uniform: SceneUniform,
        mode: RenderMode,
        num_workers: usize,
    ) -> Self {
        Self {
            camera_state,
            render_scheduler: RenderScheduler::new(mode),
            renderer,
            task_manager: TaskManager::new(num_workers),
            scene_uniform,
            cube: None,
            viewer_actions: ViewerAction::default(),
            start_time: web_time::Instant::now(),
        }
    }

    /// Resizes the rendering surface and the projection.
    pub fn resize_surface(&mut self, size: PhysicalSize<u32>) {
        if self.renderer.resize(size) {
            self.camera_state.resize(size.width, size.height);
            self.render_scheduler.request_render_if_not_requested();
        }
    }

    /// Draws a frame. A skipped frame is requested again.
    pub fn render(&mut self) {
        self.render_scheduler.take_render_request();

        if let Some(cube) = &self.cube {
            let seconds = self.start_time.elapsed().as_secs_f32();
            self.scene_uniform.set_model(cube.model_matrix(seconds));
        }
        self.scene_uniform.set_camera(self.camera_state.camera_uniform);

        if self.renderer.render(&self.scene_uniform) == FrameStatus::Skipped {
            self.render_scheduler.request_render_if_not_requested();
        }
    }

    /// Hands finished work to the renderer and dispatches queued tasks.
    pub fn process_tasks(&mut self) {
        let completed = self.task_manager.process_completed_tasks(&mut self.renderer);
        self.task_manager.process_queued_tasks();

        if completed > 0 {
            self.render_scheduler.request_render_if_not_requested();
        }
    }

    /// Whether background generation is still running or queued.
    pub fn has_pending_tasks(&self) -> bool {
        !self.task_manager.is_idle()
    }

    /// Applies the pending viewer actions to the orbit controls.
    pub fn process_input(&mut self) {
        let actions = std::mem::take(&mut self.viewer_actions);
        let viewport_height = self.renderer.surface_size().height as f32;
        let fovy = self.camera_state.projection.fovy();

        if let Some(controls) = self.camera_state.orbit_controls.as_mut() {
            if let Some((dx, dy)) = actions.rotate {
                controls.rotate(dx, dy, viewport_height);
            }
            if let Some((dx, dy)) = actions.pan {
                controls.pan(&self.camera_state.camera, fovy, dx, dy, viewport_height);
            }
            for _ in 0..actions.zoom_notches.unsigned_abs() {
                controls.zoom(actions.zoom_notches.signum() as f32);
            }
            if actions.reset {
                controls.reset();
            }
        }

        if self.camera_state.update() {
            self.render_scheduler.request_render_if_not_requested();
        }
    }

    /// Sets the input commands for the next call to [`EngineState::process_input`].
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.viewer_actions = translate_processed_input(&input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_state::input_state::RawInputState;

    fn input_with(button: Option<MouseButton>, delta: Option<(f64, f64)>) -> ProcessedInputState {
        let mut input = ProcessedInputState {
            cursor_delta: delta,
            ..Default::default()
        };
        if let Some(button) = button {
            input.mouse_button_states.insert(button, RawInputState::Held);
        }
        input
    }

    #[test]
    fn test_left_drag_rotates() {
        let action = translate_processed_input(&input_with(Some(MouseButton::Left), Some((4.0, -2.0))));
        assert_eq!(action.rotate, Some((4.0, -2.0)));
        assert_eq!(action.pan, None);
    }

    #[test]
    fn test_right_drag_pans() {
        let action = translate_processed_input(&input_with(Some(MouseButton::Right), Some((4.0, -2.0))));
        assert_eq!(action.rotate, None);
        assert_eq!(action.pan, Some((4.0, -2.0)));
    }

    #[test]
    fn test_hover_without_buttons_does_nothing() {
        let action = translate_processed_input(&input_with(None, Some((10.0, 10.0))));
        assert!(action.is_empty());
    }

    #[test]
    fn test_wheel_and_reset() {
        let mut input = input_with(None, None);
        input.wheel_notches = -2;
        input.keyboard_states.insert(KeyCode::KeyR, RawInputState::Pressed);
        let action = translate_processed_input(&input);
        assert_eq!(action.zoom_notches, -2);
        assert!(action.reset);

        input.keyboard_states.insert(KeyCode::KeyR, RawInputState::Held);
        assert!(!translate_processed_input(&input).reset);
    }
}
