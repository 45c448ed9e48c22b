//! # Chunk Module
//!
//! This module provides the `BlockGrid` struct holding the blocks of one chunk,
//! together with the arithmetic that maps world block positions onto chunk
//! coordinates and local positions.
//!
//! ## Layout
//!
//! A grid is a dense `width × height × width` array indexed `[x][y][z]`, stored
//! flat with `z` varying fastest. Air is the all-zero value, so a new grid is
//! a single zeroed allocation. Grids are never resized.

use cgmath::Point3;

use super::block::{block_type::BlockType, Block};

mod coordinates;

pub use coordinates::*;

/// Dense block storage for one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    width: usize,
    height: usize,
    blocks: Vec<Block>,
}

impl BlockGrid {
    /// Creates a grid filled with air.
    pub fn new(width: usize, height: usize) -> Self {
        BlockGrid {
            width,
            height,
            blocks: vec![Block::AIR; width * height * width],
        }
    }

    /// Creates a grid with every cell set to `block_type`.
    pub fn filled(width: usize, height: usize, block_type: BlockType) -> Self {
        BlockGrid {
            width,
            height,
            blocks: vec![Block::new(block_type); width * height * width],
        }
    }

    /// Horizontal extent in blocks.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Vertical extent in blocks.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the local position lies inside the grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.width
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.height + y) * self.width + z
    }

    /// Bounds-checked read. `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some(self.blocks[self.index(x as usize, y as usize, z as usize)])
    }

    /// Reads a block by local position.
    #[inline]
    pub fn get_at(&self, position: Point3<i32>) -> Option<Block> {
        self.get(position.x, position.y, position.z)
    }

    /// Writes a block. Returns `false` and leaves the grid untouched when the
    /// position is outside the grid.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> bool {
        if !self.contains(x, y, z) {
            return false;
        }
        let index = self.index(x as usize, y as usize, z as usize);
        self.blocks[index] = Block::new(block_type);
        true
    }

    /// Writes a block by local position.
    pub fn set_at(&mut self, position: Point3<i32>, block_type: BlockType) -> bool {
        self.set(position.x, position.y, position.z, block_type)
    }

    /// The raw block storage in `[x][y][z]` order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The raw storage viewed as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.blocks)
    }

    /// Number of non-air blocks.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_air() {
        let grid = BlockGrid::new(4, 8);
        assert_eq!(grid.blocks().len(), 4 * 8 * 4);
        assert_eq!(grid.solid_count(), 0);
        assert!(grid.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn get_is_bounds_checked() {
        let grid = BlockGrid::filled(4, 8, BlockType::STONE);
        assert_eq!(grid.get(3, 7, 3), Some(Block::new(BlockType::STONE)));
        assert_eq!(grid.get(4, 0, 0), None);
        assert_eq!(grid.get(0, 8, 0), None);
        assert_eq!(grid.get(0, 0, -1), None);
    }

    #[test]
    fn set_writes_only_the_addressed_cell() {
        let mut grid = BlockGrid::new(4, 8);
        assert!(grid.set(1, 2, 3, BlockType::GRASS));
        assert_eq!(grid.get(1, 2, 3), Some(Block::new(BlockType::GRASS)));
        assert_eq!(grid.solid_count(), 1);
        assert_eq!(grid.get(3, 2, 1), Some(Block::AIR));
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut grid = BlockGrid::new(4, 8);
        assert!(!grid.set(0, -1, 0, BlockType::STONE));
        assert!(!grid.set(0, 0, 4, BlockType::STONE));
        assert_eq!(grid.solid_count(), 0);
    }
}
