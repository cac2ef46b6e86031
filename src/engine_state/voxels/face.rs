//! # Voxel Face Module
//!
//! This module defines the six faces of a unit voxel, each with its outward direction
//! and the four corners of its quad.

use cgmath::Vector3;

/// Represents the six faces of a voxel.
///
/// The declaration order is the order the mesher visits faces in:
/// [LEFT, RIGHT, BOTTOM, TOP, BACK, FRONT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelFace {
    /// The left face (facing negative X)
    Left = 0,
    /// The right face (facing positive X)
    Right = 1,
    /// The bottom face (facing negative Y)
    Bottom = 2,
    /// The top face (facing positive Y)
    Top = 3,
    /// The back face (facing negative Z)
    Back = 4,
    /// The front face (facing positive Z)
    Front = 5,
}

impl VoxelFace {
    /// Returns an array containing all six faces in meshing order.
    pub const fn all() -> [VoxelFace; 6] {
        [
            VoxelFace::Left,
            VoxelFace::Right,
            VoxelFace::Bottom,
            VoxelFace::Top,
            VoxelFace::Back,
            VoxelFace::Front,
        ]
    }

    /// Unit offset towards the neighbour sharing this face.
    pub const fn dir(self) -> [i32; 3] {
        match self {
            VoxelFace::Left => [-1, 0, 0],
            VoxelFace::Right => [1, 0, 0],
            VoxelFace::Bottom => [0, -1, 0],
            VoxelFace::Top => [0, 1, 0],
            VoxelFace::Back => [0, 0, -1],
            VoxelFace::Front => [0, 0, 1],
        }
    }

    /// Outward normal as a float vector.
    pub fn normal(self) -> Vector3<f32> {
        let [x, y, z] = self.dir();
        Vector3::new(x as f32, y as f32, z as f32)
    }

    /// Quad corners on the unit cube.
    ///
    /// Triangles `(0, 1, 2)` and `(2, 1, 3)` over these corners are counter-clockwise
    /// when seen from outside the voxel.
    pub const fn corners(self) -> [[u8; 3]; 4] {
        match self {
            VoxelFace::Left => [[0, 1, 0], [0, 0, 0], [0, 1, 1], [0, 0, 1]],
            VoxelFace::Right => [[1, 1, 1], [1, 0, 1], [1, 1, 0], [1, 0, 0]],
            VoxelFace::Bottom => [[1, 0, 1], [0, 0, 1], [1, 0, 0], [0, 0, 0]],
            VoxelFace::Top => [[0, 1, 1], [1, 1, 1], [0, 1, 0], [1, 1, 0]],
            VoxelFace::Back => [[1, 0, 0], [0, 0, 0], [1, 1, 0], [0, 1, 0]],
            VoxelFace::Front => [[0, 0, 1], [1, 0, 1], [0, 1, 1], [1, 1, 1]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn corner(c: [u8; 3]) -> Vector3<f32> {
        Vector3::new(c[0] as f32, c[1] as f32, c[2] as f32)
    }

    #[test]
    fn test_both_triangles_face_outward() {
        for face in VoxelFace::all() {
            let c = face.corners().map(corner);
            for [a, b, d] in [[0, 1, 2], [2, 1, 3]] {
                let n = (c[b] - c[a]).cross(c[d] - c[a]);
                assert!(
                    n.normalize().dot(face.normal()) > 0.99,
                    "{:?} triangle {:?} winds inward",
                    face,
                    [a, b, d]
                );
            }
        }
    }

    #[test]
    fn test_corners_lie_on_the_face_plane() {
        for face in VoxelFace::all() {
            let dir = face.dir();
            let axis = dir.iter().position(|d| *d != 0).unwrap();
            let plane = if dir[axis] > 0 { 1 } else { 0 };
            for c in face.corners() {
                assert_eq!(c[axis], plane, "{:?}", face);
            }
        }
    }

    #[test]
    fn test_directions_are_distinct_unit_axes() {
        let dirs: Vec<[i32; 3]> = VoxelFace::all().iter().map(|f| f.dir()).collect();
        for (i, a) in dirs.iter().enumerate() {
            assert_eq!(a.iter().map(|v| v.abs()).sum::<i32>(), 1);
            for b in &dirs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
