//! Face-culling mesh generation for a voxel cell.
//!
//! Every solid voxel is visited once and emits one quad per face whose neighbour is
//! empty. Faces between two solid voxels are never produced, so the mesh only holds
//! the visible shell of the terrain. Quads are not merged.

use super::{face::VoxelFace, world::VoxelWorld};

/// Flat vertex data for a cell mesh.
///
/// `positions` and `normals` hold three floats per vertex; every face adds four
/// vertices and six indices.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeometryData {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends one quad with the given corners offset by `(x, y, z)`.
    fn push_face(&mut self, face: VoxelFace, x: i32, y: i32, z: i32) {
        let ndx = self.vertex_count() as u32;
        let dir = face.dir();
        for corner in face.corners() {
            self.positions.extend_from_slice(&[
                (corner[0] as i32 + x) as f32,
                (corner[1] as i32 + y) as f32,
                (corner[2] as i32 + z) as f32,
            ]);
            self.normals
                .extend_from_slice(&[dir[0] as f32, dir[1] as f32, dir[2] as f32]);
        }
        self.indices
            .extend_from_slice(&[ndx, ndx + 1, ndx + 2, ndx + 2, ndx + 1, ndx + 3]);
    }
}

impl VoxelWorld {
    /// Builds the mesh of the cell at cell coordinates `(cell_x, cell_y, cell_z)`.
    ///
    /// Positions are local to the cell. Any cell other than (0, 0, 0) holds no voxels
    /// and yields empty geometry.
    pub fn generate_geometry_data_for_cell(
        &self,
        cell_x: i32,
        cell_y: i32,
        cell_z: i32,
    ) -> GeometryData {
        let mut geometry = GeometryData::default();
        if (cell_x, cell_y, cell_z) != (0, 0, 0) {
            return geometry;
        }

        // the origin cell starts at voxel (0, 0, 0), so local and world coordinates agree
        let cell_size = self.cell_size();
        for y in 0..cell_size {
            for z in 0..cell_size {
                for x in 0..cell_size {
                    if self.get_voxel(x, y, z) == 0 {
                        continue;
                    }

                    for face in VoxelFace::all() {
                        let [dx, dy, dz] = face.dir();
                        let neighbor = self.get_voxel(x + dx, y + dy, z + dz);
                        if neighbor == 0 {
                            geometry.push_face(face, x, y, z);
                        }
                    }
                }
            }
        }

        geometry
    }
}
