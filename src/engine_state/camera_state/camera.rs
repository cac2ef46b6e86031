//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Camera representation as an eye looking at a target point
//! - Projection matrix handling
//! - GPU uniform data
//!
//! ## Key Components
//! - `Camera`: The eye position and the point it looks at
//! - `Projection`: Manages perspective projection settings
//! - `CameraUniform`: Packed data structure for GPU shaders

use cgmath::*;

use crate::config::PerspectiveConfig;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// NDC depth in WGPU ranges from 0 to 1 instead of OpenGL's -1 to 1.
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// A camera at `position` looking at `target` with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// The point the camera looks at
    pub target: Point3<f32>,
}

impl Camera {
    /// Creates a new camera.
    ///
    /// # Example
    /// ```ignore
    /// use cgmath::Point3;
    /// let camera = Camera::new(Point3::new(0.0, 0.0, 2.0), Point3::new(0.0, 0.0, 0.0));
    /// ```
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    /// Normalized direction from the eye towards the target.
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Camera space basis in world coordinates: right and up.
    ///
    /// These are the first two columns of the camera's world matrix.
    pub fn right_and_up(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = self.forward();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward);
        (right, up)
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

/// Represents a camera's projection matrix and related parameters.
///
/// This handles the perspective projection used to render the 3D scene.
/// It manages the aspect ratio, field of view, and near/far clipping planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: Self::aspect_of(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn from_config(width: u32, height: u32, config: &PerspectiveConfig) -> Self {
        Self::new(width, height, Deg(config.fov_degrees), config.near, config.far)
    }

    /// A zero height keeps the aspect at 1 rather than producing infinity.
    fn aspect_of(width: u32, height: u32) -> f32 {
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = Self::aspect_of(width, height);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fovy(&self) -> Rad<f32> {
        self.fovy
    }

    /// Calculates the projection matrix.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // We can't use cgmath with bytemuck directly so we'll have to convert the Matrix4 into a 4x4 f32 array
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Creates a new camera uniform with an identity matrix and zero position.
    pub fn new() -> Self {
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            position: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Updates the view-projection matrix and eye position from the camera.
    pub fn update_view_proj_and_pos(&mut self, camera: &Camera, projection: &Projection) {
        let viewproj = projection.calc_matrix() * camera.calc_matrix();
        self.view_proj = viewproj.into();
        let pos3: [f32; 3] = camera.position.into();
        self.position = [pos3[0], pos3[1], pos3[2], 1.0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::new(Point3::new(-75.0, 200.0, -75.0), Point3::new(125.0, 83.3, 125.0));
        let projection = Projection::new(1280, 720, Deg(75.0), 0.1, 1000.0);
        let clip = projection.calc_matrix() * camera.calc_matrix() * camera.target.to_homogeneous();
        assert!(approx(clip.x / clip.w, 0.0));
        assert!(approx(clip.y / clip.w, 0.0));
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_depth_range_is_zero_to_one() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 2.0), Point3::new(0.0, 0.0, 0.0));
        let projection = Projection::new(800, 600, Deg(75.0), 0.1, 5.0);
        let vp = projection.calc_matrix() * camera.calc_matrix();

        let near = vp * Point3::new(0.0, 0.0, 2.0 - 0.1).to_homogeneous();
        let far = vp * Point3::new(0.0, 0.0, 2.0 - 5.0).to_homogeneous();
        assert!(approx(near.z / near.w, 0.0));
        assert!(approx(far.z / far.w, 1.0));
    }

    #[test]
    fn test_resize_updates_aspect_and_ignores_zero_height() {
        let mut projection = Projection::new(800, 600, Deg(75.0), 0.1, 5.0);
        assert!(approx(projection.aspect(), 800.0 / 600.0));
        projection.resize(1920, 1080);
        assert!(approx(projection.aspect(), 1920.0 / 1080.0));
        projection.resize(1920, 0);
        assert!(projection.aspect().is_finite());
    }

    #[test]
    fn test_camera_basis_is_orthonormal() {
        let camera = Camera::new(Point3::new(3.0, 4.0, 5.0), Point3::new(0.0, 1.0, 0.0));
        let (right, up) = camera.right_and_up();
        let forward = camera.forward();
        assert!(approx(right.magnitude(), 1.0));
        assert!(approx(up.magnitude(), 1.0));
        assert!(approx(right.dot(up), 0.0));
        assert!(approx(right.dot(forward), 0.0));
        assert!(approx(right.y, 0.0));
        assert!(up.y > 0.0);
    }

    #[test]
    fn test_uniform_carries_eye_position() {
        let camera = Camera::new(Point3::new(1.0, 2.0, 3.0), Point3::new(0.0, 0.0, 0.0));
        let projection = Projection::new(100, 100, Deg(90.0), 0.1, 10.0);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj_and_pos(&camera, &projection);
        assert_eq!(uniform.position, [1.0, 2.0, 3.0, 1.0]);
        assert_ne!(uniform.view_proj, CameraUniform::new().view_proj);
    }
}
