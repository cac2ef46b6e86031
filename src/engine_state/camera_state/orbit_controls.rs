//! # Orbit Controls
//!
//! Mouse driven camera that circles a target point. Input is accumulated between
//! frames and applied in [`OrbitControls::update`], which moves the [`Camera`] and
//! reports whether anything changed so on-demand rendering knows to redraw.
//!
//! - Rotate: a drag across the full viewport height turns the camera a full circle
//! - Pan: moves the target in the camera plane so the point under the cursor follows it
//! - Zoom: each wheel event scales the distance to the target by `zoom_scale`

use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Rad, Vector3};

use super::camera::Camera;

/// Keeps the polar angle off the poles where the look-at basis degenerates.
const POLAR_EPSILON: f32 = 1e-6;

/// Squared movement below which an update does not count as a change.
const CHANGE_EPSILON: f32 = 1e-6;

/// A point on a sphere around the target.
///
/// `theta` is the azimuth around +Y measured from +Z, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_vector(v: Vector3<f32>) -> Self {
        let radius = v.magnitude();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vector(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Debug)]
pub struct OrbitControls {
    /// The point the camera orbits around
    pub target: Point3<f32>,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: Rad<f32>,
    pub max_polar_angle: Rad<f32>,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    /// Distance factor applied per wheel event
    pub zoom_scale: f32,

    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vector3<f32>,
    reset_requested: bool,

    position0: Point3<f32>,
    target0: Point3<f32>,
}

impl OrbitControls {
    /// Orbits `target`, remembering the camera's current position as the reset pose.
    pub fn new(camera: &Camera, target: Point3<f32>) -> Self {
        Self {
            target,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: Rad(0.0),
            max_polar_angle: Rad(PI),
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_scale: 0.95,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vector3::new(0.0, 0.0, 0.0),
            reset_requested: false,
            position0: camera.position,
            target0: target,
        }
    }

    /// Rotates by a cursor drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.spherical_delta.theta -= 2.0 * PI * dx / viewport_height * self.rotate_speed;
        self.spherical_delta.phi -= 2.0 * PI * dy / viewport_height * self.rotate_speed;
    }

    /// Pans by a cursor drag of `(dx, dy)` pixels, scaled so the target plane moves with the cursor.
    pub fn pan(&mut self, camera: &Camera, fovy: Rad<f32>, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let target_distance = (camera.position - self.target).magnitude() * (fovy.0 / 2.0).tan();
        let (right, up) = camera.right_and_up();

        let left = 2.0 * dx * target_distance / viewport_height * self.pan_speed;
        let upward = 2.0 * dy * target_distance / viewport_height * self.pan_speed;
        self.pan_offset += right * -left;
        self.pan_offset += up * upward;
    }

    /// Zooms on a wheel event. Positive `delta_y` (wheel pushed away) moves closer.
    pub fn zoom(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.scale *= self.zoom_scale;
        } else if delta_y < 0.0 {
            self.scale /= self.zoom_scale;
        }
    }

    /// Returns to the pose the controls were created with on the next update.
    pub fn reset(&mut self) {
        self.reset_requested = true;
        self.spherical_delta = Spherical::default();
        self.scale = 1.0;
        self.pan_offset = Vector3::new(0.0, 0.0, 0.0);
    }

    /// Whether input is waiting to be applied.
    pub fn has_updates(&self) -> bool {
        self.reset_requested
            || self.spherical_delta != Spherical::default()
            || self.scale != 1.0
            || self.pan_offset != Vector3::new(0.0, 0.0, 0.0)
    }

    /// Applies accumulated input to `camera`. Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let last_position = camera.position;
        let last_target = camera.target;

        if self.reset_requested {
            self.reset_requested = false;
            self.target = self.target0;
            camera.position = self.position0;
        }

        let mut spherical = Spherical::from_vector(camera.position - self.target);
        spherical.theta += self.spherical_delta.theta;
        spherical.phi += self.spherical_delta.phi;

        let min_phi = self.min_polar_angle.0.max(POLAR_EPSILON);
        let max_phi = self.max_polar_angle.0.min(PI - POLAR_EPSILON);
        spherical.phi = spherical.phi.clamp(min_phi, max_phi);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset;
        camera.target = self.target;
        camera.position = self.target + spherical.to_vector();

        self.spherical_delta = Spherical::default();
        self.scale = 1.0;
        self.pan_offset = Vector3::new(0.0, 0.0, 0.0);

        (camera.position - last_position).magnitude2() > CHANGE_EPSILON
            || (camera.target - last_target).magnitude2() > CHANGE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn setup() -> (Camera, OrbitControls) {
        let camera = Camera::new(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0));
        let controls = OrbitControls::new(&camera, camera.target);
        (camera, controls)
    }

    #[test]
    fn test_spherical_round_trip() {
        let v = Vector3::new(-75.0, 200.0, -75.0);
        let back = Spherical::from_vector(v).to_vector();
        assert!(approx(back.x, v.x) && approx(back.y, v.y) && approx(back.z, v.z));
    }

    #[test]
    fn test_no_input_means_no_change() {
        let (mut camera, mut controls) = setup();
        assert!(!controls.has_updates());
        assert!(!controls.update(&mut camera));
        assert!(approx(camera.position.z, 5.0));
    }

    #[test]
    fn test_quarter_height_drag_turns_a_quarter() {
        let (mut camera, mut controls) = setup();
        controls.rotate(150.0, 0.0, 600.0);
        assert!(controls.update(&mut camera));
        assert!(approx(camera.position.x, -5.0));
        assert!(approx(camera.position.z, 0.0));
        assert!(approx((camera.position - camera.target).magnitude(), 5.0));
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let (mut camera, mut controls) = setup();
        controls.rotate(0.0, 10_000.0, 600.0);
        controls.update(&mut camera);
        let p = camera.position;
        assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        assert!(approx(p.y, 5.0));
        assert!(approx((p - camera.target).magnitude(), 5.0));
    }

    #[test]
    fn test_wheel_zooms_by_scale_per_event() {
        let (mut camera, mut controls) = setup();
        controls.zoom(1.0);
        controls.update(&mut camera);
        assert!(approx(camera.position.z, 4.75));

        controls.zoom(-1.0);
        controls.update(&mut camera);
        assert!(approx(camera.position.z, 5.0));
    }

    #[test]
    fn test_pan_moves_target_with_the_cursor() {
        let (mut camera, mut controls) = setup();
        // 90 degree fov: half height at the target plane equals the distance
        controls.pan(&camera, Deg(90.0).into(), 300.0, 0.0, 600.0);
        assert!(controls.update(&mut camera));
        assert!(approx(camera.target.x, -5.0));
        assert!(approx(camera.position.x, -5.0));
        assert!(approx(camera.position.z, 5.0));
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let (mut camera, mut controls) = setup();
        controls.rotate(100.0, 50.0, 600.0);
        controls.zoom(1.0);
        controls.update(&mut camera);
        controls.pan(&camera, Deg(75.0).into(), 30.0, 10.0, 600.0);
        controls.update(&mut camera);

        controls.reset();
        assert!(controls.update(&mut camera));
        assert!(approx(camera.position.x, 0.0));
        assert!(approx(camera.position.y, 0.0));
        assert!(approx(camera.position.z, 5.0));
        assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_viewport_is_ignored() {
        let (mut camera, mut controls) = setup();
        controls.rotate(100.0, 100.0, 0.0);
        controls.pan(&camera, Deg(75.0).into(), 100.0, 100.0, 0.0);
        assert!(!controls.update(&mut camera));
    }
}
