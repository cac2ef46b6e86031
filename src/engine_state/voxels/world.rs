//! # World Module
//!
//! This module provides the `VoxelWorld` struct, a single fixed-size cell of voxels that
//! makes up the entire world of the terrain viewer.
//!
//! ## Storage
//!
//! One byte per voxel in a flat vector, laid out as `y * size² + z * size + x`.
//! A value of 0 is empty and anything else is solid.
//!
//! ## Addressing
//!
//! Voxel coordinates are world coordinates. Only the cell at cell coordinates (0, 0, 0)
//! exists, so coordinates outside `0..size` on any axis resolve to no cell: writes there
//! are dropped and reads return 0.

/// A single voxel value. 0 is empty, anything else is solid.
pub type Voxel = u8;

/// Largest cell edge whose voxel count fits the address space.
#[cfg(target_pointer_width = "64")]
pub const MAX_CELL_SIZE: u32 = 1 << 16;
#[cfg(not(target_pointer_width = "64"))]
pub const MAX_CELL_SIZE: u32 = 1290;

/// A fixed-size cubic cell of voxels.
///
/// # Examples
///
/// ```ignore
/// let mut world = VoxelWorld::new(16);
/// world.set_voxel(1, 2, 3, 1);
/// assert_eq!(world.get_voxel(1, 2, 3), 1);
///
/// // Outside the single cell: the write is ignored
/// world.set_voxel(-1, 0, 0, 1);
/// assert_eq!(world.get_voxel(-1, 0, 0), 0);
/// ```
pub struct VoxelWorld {
    cell_size: i32,
    cell_slice_size: usize,
    cell: Vec<Voxel>,
}

impl VoxelWorld {
    /// Allocates an empty cell of `cell_size³` voxels.
    ///
    /// A size of 0 is treated as 1 and sizes above [`MAX_CELL_SIZE`] are clamped to it.
    pub fn new(cell_size: u32) -> Self {
        let cell_size = cell_size.clamp(1, MAX_CELL_SIZE);
        let size = cell_size as usize;
        let cell_slice_size = size * size;
        Self {
            cell_size: cell_size as i32,
            cell_slice_size,
            cell: vec![0; cell_slice_size * size],
        }
    }

    /// Edge length of the cell in voxels.
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Index of a voxel inside its cell. Each axis wraps with a Euclidean modulo so
    /// negative coordinates map into `0..size` as well.
    pub fn compute_voxel_offset(&self, x: i32, y: i32, z: i32) -> usize {
        let voxel_x = x.rem_euclid(self.cell_size) as usize;
        let voxel_y = y.rem_euclid(self.cell_size) as usize;
        let voxel_z = z.rem_euclid(self.cell_size) as usize;
        voxel_y * self.cell_slice_size + voxel_z * self.cell_size as usize + voxel_x
    }

    /// Cell coordinates of the cell containing a voxel.
    pub fn cell_coordinates(&self, x: i32, y: i32, z: i32) -> (i32, i32, i32) {
        (
            x.div_euclid(self.cell_size),
            y.div_euclid(self.cell_size),
            z.div_euclid(self.cell_size),
        )
    }

    /// Returns the cell holding the voxel, or `None` when the voxel lies outside cell (0, 0, 0).
    pub fn get_cell_for_voxel(&self, x: i32, y: i32, z: i32) -> Option<&[Voxel]> {
        if self.cell_coordinates(x, y, z) != (0, 0, 0) {
            return None;
        }
        Some(&self.cell)
    }

    /// Mutable variant of [`VoxelWorld::get_cell_for_voxel`].
    pub fn get_cell_for_voxel_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut [Voxel]> {
        if self.cell_coordinates(x, y, z) != (0, 0, 0) {
            return None;
        }
        Some(&mut self.cell)
    }

    /// Writes a voxel. Writes outside the cell are ignored.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, v: Voxel) {
        let voxel_offset = self.compute_voxel_offset(x, y, z);
        if let Some(cell) = self.get_cell_for_voxel_mut(x, y, z) {
            cell[voxel_offset] = v;
        }
    }

    /// Reads a voxel. Everything outside the cell reads as empty.
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> Voxel {
        match self.get_cell_for_voxel(x, y, z) {
            Some(cell) => cell[self.compute_voxel_offset(x, y, z)],
            None => 0,
        }
    }

    /// Number of non-empty voxels in the cell.
    pub fn solid_count(&self) -> usize {
        self.cell.iter().filter(|v| **v != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_empty() {
        let world = VoxelWorld::new(8);
        assert_eq!(world.cell_size(), 8);
        assert_eq!(world.solid_count(), 0);
        assert_eq!(world.get_voxel(3, 3, 3), 0);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let mut world = VoxelWorld::new(0);
        assert_eq!(world.cell_size(), 1);
        world.set_voxel(0, 0, 0, 4);
        assert_eq!(world.get_voxel(0, 0, 0), 4);
    }

    #[test]
    fn test_offset_layout_is_y_then_z_then_x() {
        let world = VoxelWorld::new(10);
        assert_eq!(world.compute_voxel_offset(0, 0, 0), 0);
        assert_eq!(world.compute_voxel_offset(1, 0, 0), 1);
        assert_eq!(world.compute_voxel_offset(0, 0, 1), 10);
        assert_eq!(world.compute_voxel_offset(0, 1, 0), 100);
        assert_eq!(world.compute_voxel_offset(9, 9, 9), 999);
    }

    #[test]
    fn test_large_cell_addresses_its_top_layer() {
        let mut world = VoxelWorld::new(1300);
        assert_eq!(world.compute_voxel_offset(0, 1299, 0), 1299 * 1300 * 1300);
        assert_eq!(
            world.compute_voxel_offset(1299, 1299, 1299),
            1300 * 1300 * 1300 - 1
        );

        world.set_voxel(0, 1299, 0, 1);
        assert_eq!(world.get_voxel(0, 1299, 0), 1);
        assert_eq!(world.get_voxel(0, 1300, 0), 0);
    }

    #[test]
    fn test_max_cell_size_is_addressable() {
        let size = MAX_CELL_SIZE as usize;
        assert!(size.checked_pow(3).is_some_and(|n| n <= isize::MAX as usize));
        // neighbour lookups step one voxel past the edge
        assert!((MAX_CELL_SIZE as i64) < i32::MAX as i64);
    }

    #[test]
    fn test_offset_wraps_negative_coordinates() {
        let world = VoxelWorld::new(10);
        assert_eq!(
            world.compute_voxel_offset(-1, 0, 0),
            world.compute_voxel_offset(9, 0, 0)
        );
        assert_eq!(
            world.compute_voxel_offset(12, -11, 3),
            world.compute_voxel_offset(2, 9, 3)
        );
    }

    #[test]
    fn test_only_the_origin_cell_exists() {
        let world = VoxelWorld::new(4);
        assert!(world.get_cell_for_voxel(0, 0, 0).is_some());
        assert!(world.get_cell_for_voxel(3, 3, 3).is_some());
        assert!(world.get_cell_for_voxel(4, 0, 0).is_none());
        assert!(world.get_cell_for_voxel(0, -1, 0).is_none());
        assert!(world.get_cell_for_voxel(0, 0, 100).is_none());
        assert_eq!(world.cell_coordinates(-1, 4, 9), (-1, 1, 2));
    }

    #[test]
    fn test_set_and_get_round_trip_inside_the_cell() {
        let mut world = VoxelWorld::new(4);
        world.set_voxel(1, 2, 3, 7);
        assert_eq!(world.get_voxel(1, 2, 3), 7);
        assert_eq!(world.solid_count(), 1);

        world.set_voxel(1, 2, 3, 0);
        assert_eq!(world.get_voxel(1, 2, 3), 0);
        assert_eq!(world.solid_count(), 0);
    }

    #[test]
    fn test_out_of_range_writes_are_ignored() {
        let mut world = VoxelWorld::new(4);
        world.set_voxel(4, 0, 0, 1);
        world.set_voxel(-1, 0, 0, 1);
        world.set_voxel(0, 0, -4, 1);
        assert_eq!(world.solid_count(), 0);
        // would alias (0, 0, 0) if the cell check were missing
        assert_eq!(world.get_voxel(0, 0, 0), 0);
        assert_eq!(world.get_voxel(4, 0, 0), 0);
    }
}
