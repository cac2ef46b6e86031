//! # Terrain Generation
//!
//! Fills a [`VoxelWorld`] procedurally. Three shapes are supported:
//! - `Heightmap`: one noise sample per (x, z) column gives the column height
//! - `Sine`: two sine waves give the column height, useful to check meshing without noise
//! - `Density`: a 3D noise field with a threshold, giving overhangs and floating islands
//!
//! Any [`NoiseFn`] can drive the fill, so the crate's [`ImprovedNoise`] and the `noise`
//! crate's generators are interchangeable.

use std::f64::consts::PI;

use log::info;
use noise::{NoiseFn, Perlin};

use crate::config::{NoiseSource, TerrainShape, VoxelsConfig};

use super::{noise::ImprovedNoise, world::VoxelWorld};

/// Value written for every solid terrain voxel.
pub const TERRAIN_VOXEL: u8 = 1;

/// Noise generators selectable from the configuration.
pub enum TerrainNoise {
    Improved(ImprovedNoise),
    Perlin(Perlin),
}

impl TerrainNoise {
    /// Builds the configured generator. Without a seed every call yields a different field.
    pub fn new(source: NoiseSource, seed: Option<u64>) -> Self {
        match source {
            NoiseSource::Improved => TerrainNoise::Improved(ImprovedNoise::new(seed)),
            NoiseSource::Perlin => {
                let seed = seed.map(|s| s as u32).unwrap_or_else(|| fastrand::u32(..));
                TerrainNoise::Perlin(Perlin::new(seed))
            }
        }
    }
}

impl NoiseFn<f64, 3> for TerrainNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        match self {
            TerrainNoise::Improved(noise) => noise.get(point),
            TerrainNoise::Perlin(noise) => noise.get(point),
        }
    }
}

/// Decides which voxels of a cell are solid.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGenerator {
    pub shape: TerrainShape,
    /// Fraction of the cell height where generation starts
    pub floor: f64,
}

impl TerrainGenerator {
    pub fn new(shape: TerrainShape, floor: f64) -> Self {
        Self { shape, floor }
    }

    pub fn from_config(config: &VoxelsConfig) -> Self {
        Self::new(config.terrain.clone(), config.floor)
    }

    /// Height of the terrain surface over column `(x, z)`, for the column based shapes.
    pub fn column_height<N: NoiseFn<f64, 3>>(&self, noise: &N, size: f64, x: f64, z: f64) -> Option<f64> {
        match self.shape {
            TerrainShape::Heightmap {
                frequency,
                sample_y,
                amplitude,
                base,
            } => Some(
                noise.get([x * frequency / size, sample_y, z * frequency / size]) * (size * amplitude)
                    + size * base,
            ),
            TerrainShape::Sine => Some(
                ((x / size * PI * 2.0).sin() + (z / size * PI * 3.0).sin()) * (size / 6.0) + size / 2.0,
            ),
            TerrainShape::Density { .. } => None,
        }
    }

    /// Whether the voxel at `(x, y, z)` is solid. `y` may be fractional.
    pub fn is_solid<N: NoiseFn<f64, 3>>(&self, noise: &N, size: f64, x: f64, y: f64, z: f64) -> bool {
        match self.shape {
            TerrainShape::Density { threshold } => {
                noise.get([x / size, y * 10.0 / size, z * 10.0 / size]) > threshold
            }
            _ => self
                .column_height(noise, size, x, z)
                .is_some_and(|height| y < height),
        }
    }

    /// Fills `world` and returns the number of voxels set.
    ///
    /// `y` starts at `size * floor` and keeps its fractional part while stepping, so it
    /// is the fractional value that is compared against the surface while the voxel row
    /// written is its integer part. Nothing below the floor is touched.
    pub fn fill<N: NoiseFn<f64, 3>>(&self, world: &mut VoxelWorld, noise: &N) -> usize {
        let cell_size = world.cell_size();
        let size = cell_size as f64;
        let start = web_time::Instant::now();
        let mut solid = 0;

        let mut y = size * self.floor.max(0.0);
        while y < size {
            for z in 0..cell_size {
                for x in 0..cell_size {
                    if self.is_solid(noise, size, x as f64, y, z as f64) {
                        world.set_voxel(x, y as i32, z, TERRAIN_VOXEL);
                        solid += 1;
                    }
                }
            }
            y += 1.0;
        }

        info!(
            "Filled {}³ cell with {} solid voxels in {:?}",
            cell_size,
            solid,
            start.elapsed()
        );
        solid
    }
}
