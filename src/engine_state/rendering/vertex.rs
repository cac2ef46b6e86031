//! Vertex data structures and layouts for mesh rendering.
//!
//! This module defines the vertex format shared by the voxel terrain and the cube,
//! and converts mesher output into it.

use crate::engine_state::voxels::geometry::GeometryData;

/// A vertex in the mesh rendering pipeline.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Unit normal of the face the vertex belongs to
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Vertex { position, normal }
    }

    /// Interleaves the flat position and normal arrays of a mesh.
    pub fn from_geometry(geometry: &GeometryData) -> Vec<Vertex> {
        geometry
            .positions
            .chunks_exact(3)
            .zip(geometry.normals.chunks_exact(3))
            .map(|(p, n)| Vertex::new([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
            .collect()
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_geometry_interleaves() {
        let geometry = GeometryData {
            positions: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            normals: vec![0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
            indices: vec![],
        };
        let vertices = Vertex::from_geometry(&geometry);
        assert_eq!(
            vertices,
            vec![
                Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0]),
                Vertex::new([4.0, 5.0, 6.0], [0.0, 0.0, -1.0]),
            ]
        );
    }

    #[test]
    fn test_layout_stride() {
        assert_eq!(Vertex::desc().array_stride, 24);
        assert_eq!(Vertex::desc().attributes[1].offset, 12);
    }
}
