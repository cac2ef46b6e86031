//! # Cell Generation Task
//!
//! Fills the voxel cell from noise and meshes it on a worker thread. The result
//! carries only the finished geometry back to the main thread.

use log::{info, warn};

use crate::{
    config::{NoiseSource, VoxelsConfig},
    engine_state::{
        task_management::task::{Task, TaskResult},
        voxels::{
            geometry::GeometryData,
            terrain::{TerrainGenerator, TerrainNoise},
            world::VoxelWorld,
        },
    },
};

use super::CellMeshSink;

/// Generates and meshes the single voxel cell.
pub struct CellGenerationTask {
    cell_size: u32,
    seed: Option<u64>,
    noise: NoiseSource,
    generator: TerrainGenerator,
}

impl CellGenerationTask {
    pub fn new(config: &VoxelsConfig) -> Self {
        CellGenerationTask {
            cell_size: config.cell_size,
            seed: config.seed,
            noise: config.noise,
            generator: TerrainGenerator::from_config(config),
        }
    }

    /// Does the work of [`Task::process`] without the boxing.
    pub fn generate(&self) -> (GeometryData, usize) {
        let start = web_time::Instant::now();

        let mut world = VoxelWorld::new(self.cell_size);
        let noise = TerrainNoise::new(self.noise, self.seed);
        let solid = self.generator.fill(&mut world, &noise);

        let mesh_start = web_time::Instant::now();
        let geometry = world.generate_geometry_data_for_cell(0, 0, 0);
        info!(
            "Meshed cell into {} faces ({} vertices) in {:?}, {:?} total",
            geometry.face_count(),
            geometry.vertex_count(),
            mesh_start.elapsed(),
            start.elapsed()
        );

        (geometry, solid)
    }
}

impl<C: CellMeshSink + 'static> Task<C> for CellGenerationTask {
    fn process(&self) -> Box<dyn TaskResult<C> + Send> {
        let (geometry, solid) = self.generate();
        Box::new(CellGenerationTaskResult { geometry, solid })
    }
}

/// The finished mesh, handed to the sink on the main thread.
pub struct CellGenerationTaskResult {
    geometry: GeometryData,
    solid: usize,
}

impl<C: CellMeshSink + 'static> TaskResult<C> for CellGenerationTaskResult {
    fn handle_result(self: Box<Self>, context: &mut C) -> Vec<Box<dyn Task<C> + Send>> {
        if self.geometry.is_empty() {
            warn!("Generated cell has no visible faces ({} solid voxels)", self.solid);
        }
        context.accept_cell_mesh(self.geometry);
        Vec::new()
    }
}
