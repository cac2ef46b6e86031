//! # Voxels
//!
//! The terrain viewer's world: a single cubic cell of voxels filled from noise and
//! turned into a face-culled triangle mesh.
//!
//! * **noise**: improved Perlin noise with a shuffled permutation table
//! * **world**: the voxel cell and its addressing rules
//! * **face**: the six voxel faces and their quad corners
//! * **geometry**: the face-culling mesher
//! * **terrain**: fills the cell from a noise field
//! * **tasks**: runs generation and meshing on a worker thread
//!
//! ## Data Flow
//!
//! 1. A `CellGenerationTask` is published with the terrain settings
//! 2. A worker fills a `VoxelWorld` and meshes cell (0, 0, 0)
//! 3. The `GeometryData` is handed to the renderer on the main thread

pub mod face;
pub mod geometry;
pub mod noise;
pub mod tasks;
pub mod terrain;
pub mod world;
