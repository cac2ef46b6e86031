//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and target tracking
//! - View and projection matrix calculations
//! - Orbit controls for the terrain viewer
//!
//! ## Core Components
//! - `Camera`: The eye position and the point it looks at
//! - `OrbitControls`: Mouse driven orbiting, panning and zooming around a target
//! - `Projection`: Manages the camera's projection matrix
//! - `CameraUniform`: GPU representation of camera data for shaders

use cgmath::Point3;

pub mod camera;
pub mod orbit_controls;

use camera::{Camera, CameraUniform, Projection};
use orbit_controls::OrbitControls;

/// Camera, projection and optional orbit controls kept in sync with their GPU representation.
///
/// The uniform is only recomputed here; the renderer uploads it.
pub struct CameraState {
    /// The current camera position and target
    pub camera: Camera,
    /// Perspective settings, resized with the window
    pub projection: Projection,
    /// GPU-ready camera data for shaders
    pub camera_uniform: CameraUniform,
    /// Present for scenes the user can orbit
    pub orbit_controls: Option<OrbitControls>,
}

impl CameraState {
    /// A fixed camera with no controls.
    pub fn fixed(camera: Camera, projection: Projection) -> Self {
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj_and_pos(&camera, &projection);
        Self {
            camera,
            projection,
            camera_uniform,
            orbit_controls: None,
        }
    }

    /// A camera orbiting `target`, starting out looking at it.
    pub fn orbiting(position: Point3<f32>, target: Point3<f32>, projection: Projection) -> Self {
        let camera = Camera::new(position, target);
        let orbit_controls = OrbitControls::new(&camera, target);
        Self {
            orbit_controls: Some(orbit_controls),
            ..Self::fixed(camera, projection)
        }
    }

    /// Recomputes the uniform after the camera or projection changed.
    pub fn refresh_uniform(&mut self) {
        self.camera_uniform
            .update_view_proj_and_pos(&self.camera, &self.projection);
    }

    /// Updates the projection for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        self.refresh_uniform();
    }

    /// Applies pending orbit input. Returns `true` if the view changed.
    pub fn update(&mut self) -> bool {
        let Some(controls) = self.orbit_controls.as_mut() else {
            return false;
        };
        if !controls.has_updates() {
            return false;
        }
        let changed = controls.update(&mut self.camera);
        if changed {
            self.refresh_uniform();
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    fn projection() -> Projection {
        Projection::new(800, 600, Deg(75.0), 0.1, 1000.0)
    }

    #[test]
    fn test_fixed_camera_never_changes() {
        let mut state = CameraState::fixed(
            Camera::new(Point3::new(0.0, 0.0, 2.0), Point3::new(0.0, 0.0, 0.0)),
            projection(),
        );
        assert!(state.orbit_controls.is_none());
        assert!(!state.update());
    }

    #[test]
    fn test_orbit_input_refreshes_uniform() {
        let mut state = CameraState::orbiting(
            Point3::new(-75.0, 200.0, -75.0),
            Point3::new(125.0, 250.0 / 3.0, 125.0),
            projection(),
        );
        let before = state.camera_uniform;
        assert!(!state.update());

        if let Some(controls) = state.orbit_controls.as_mut() {
            controls.rotate(40.0, 0.0, 600.0);
        }
        assert!(state.update());
        assert_ne!(state.camera_uniform, before);
        assert_eq!(state.camera_uniform.position[0], state.camera.position.x);
    }

    #[test]
    fn test_resize_changes_projection() {
        let mut state = CameraState::fixed(
            Camera::new(Point3::new(0.0, 0.0, 2.0), Point3::new(0.0, 0.0, 0.0)),
            projection(),
        );
        let before = state.camera_uniform;
        state.resize(600, 600);
        assert_eq!(state.projection.aspect(), 1.0);
        assert_ne!(state.camera_uniform.view_proj, before.view_proj);
    }
}
