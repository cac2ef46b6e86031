//! # Voxel Task System
//!
//! Tasks that build the voxel cell off the main thread. Generating and meshing a
//! full cell takes long enough to stall a frame, so both happen on a worker and only
//! the finished geometry comes back.

pub mod cell_generation_task;

use super::geometry::GeometryData;

/// Main thread receiver of finished cell meshes.
pub trait CellMeshSink {
    /// Takes ownership of a freshly generated mesh for cell (0, 0, 0).
    fn accept_cell_mesh(&mut self, geometry: GeometryData);
}
