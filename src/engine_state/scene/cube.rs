//! # Cube Scene
//!
//! A single box centred on the origin, spinning about its X and Y axes.

use cgmath::{Matrix4, Rad};

use crate::{
    config::CubeConfig,
    engine_state::voxels::{face::VoxelFace, geometry::GeometryData},
};

/// Builds a `width x height x depth` box centred on the origin.
///
/// Each face has its own four vertices so normals stay flat, giving 24 vertices and
/// 36 indices. Faces follow the same corner table and winding as voxel faces.
pub fn box_geometry(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut geometry = GeometryData::default();
    for face in VoxelFace::all() {
        let ndx = geometry.vertex_count() as u32;
        let normal = face.normal();
        for corner in face.corners() {
            geometry.positions.extend_from_slice(&[
                (corner[0] as f32 - 0.5) * width,
                (corner[1] as f32 - 0.5) * height,
                (corner[2] as f32 - 0.5) * depth,
            ]);
            geometry
                .normals
                .extend_from_slice(&[normal.x, normal.y, normal.z]);
        }
        geometry
            .indices
            .extend_from_slice(&[ndx, ndx + 1, ndx + 2, ndx + 2, ndx + 1, ndx + 3]);
    }
    geometry
}

/// Rotation state of the spinning cube.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeScene {
    /// Radians per second about both axes
    pub rotation_speed: f32,
}

impl CubeScene {
    pub fn new(config: &CubeConfig) -> Self {
        Self {
            rotation_speed: config.rotation_speed,
        }
    }

    /// Model matrix `seconds` after start: rotation about X then about Y by the same angle.
    pub fn model_matrix(&self, seconds: f32) -> Matrix4<f32> {
        let angle = Rad(seconds * self.rotation_speed);
        Matrix4::from_angle_x(angle) * Matrix4::from_angle_y(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_unit_box_counts_and_extent() {
        let geometry = box_geometry(1.0, 1.0, 1.0);
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.indices.len(), 36);
        assert!(geometry.positions.iter().all(|c| approx(c.abs(), 0.5)));
    }

    #[test]
    fn test_box_dimensions_scale_each_axis() {
        let geometry = box_geometry(2.0, 4.0, 6.0);
        for vertex in geometry.positions.chunks(3) {
            assert!(approx(vertex[0].abs(), 1.0));
            assert!(approx(vertex[1].abs(), 2.0));
            assert!(approx(vertex[2].abs(), 3.0));
        }
    }

    #[test]
    fn test_normals_point_away_from_center() {
        let geometry = box_geometry(1.0, 1.0, 1.0);
        for (p, n) in geometry.positions.chunks(3).zip(geometry.normals.chunks(3)) {
            let dot = p[0] * n[0] + p[1] * n[1] + p[2] * n[2];
            assert!(approx(dot, 0.5));
        }
    }

    #[test]
    fn test_model_matrix_starts_at_identity() {
        let scene = CubeScene::new(&CubeConfig::default());
        assert_eq!(scene.model_matrix(0.0), Matrix4::identity());
    }

    #[test]
    fn test_rotation_applies_y_then_x() {
        let scene = CubeScene { rotation_speed: 1.0 };
        let quarter = std::f32::consts::FRAC_PI_2;
        // +Z turns to +X about Y, then +X is unchanged by X
        let v = scene.model_matrix(quarter) * Vector4::new(0.0, 0.0, 1.0, 0.0);
        assert!(approx(v.x, 1.0) && approx(v.y, 0.0) && approx(v.z, 0.0));
        // +Y is unchanged by Y, then turns to +Z about X
        let v = scene.model_matrix(quarter) * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!(approx(v.x, 0.0) && approx(v.y, 0.0) && approx(v.z, 1.0));
    }

    #[test]
    fn test_rotation_speed_scales_angle() {
        let slow = CubeScene { rotation_speed: 0.5 };
        let fast = CubeScene { rotation_speed: 1.0 };
        assert_eq!(slow.model_matrix(2.0), fast.model_matrix(1.0));
    }
}
