//! # World Module
//!
//! This module provides the `World` struct, the registry of every loaded chunk,
//! and the `NeighborResolver` that answers block queries which cross chunk
//! boundaries.
//!
//! ## Architecture
//!
//! The world uses sparse storage: only chunks the streamer has loaded are
//! present, keyed by their horizontal chunk coordinate. A chunk that is absent
//! reads as air to everyone else. Outside the batch startup pass, an entry is
//! only inserted once its grid is generated and its first mesh built, so a
//! present chunk is always complete.
//!
//! Entries are never evicted as the viewer moves away; only an explicit clear
//! (full regenerate or shutdown) removes them.

use std::collections::HashMap;

use cgmath::Point3;
use log::trace;

use crate::engine_state::rendering::meshing::GeneratedMesh;

use super::{
    block::Block,
    chunk::{world_to_chunk, wrap_to_neighbor, BlockGrid, ChunkCoordinate},
};

/// A loaded chunk: its blocks, where it sits, and its current mesh.
#[derive(Debug, Clone)]
pub struct ChunkEntry {
    /// The chunk's blocks
    pub grid: BlockGrid,
    /// World-space origin (chunk coordinate × chunk width × block scale)
    pub origin: Point3<f32>,
    /// The mesh last built from `grid` and its neighbors
    pub mesh: GeneratedMesh,
}

/// The registry of loaded chunks.
#[derive(Debug, Default)]
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkCoordinate, ChunkEntry>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Registers a chunk.
    ///
    /// If a chunk already exists at `position` the world is left unchanged and
    /// `false` is returned: loading twice is a no-op, not an error.
    pub fn insert(&mut self, position: ChunkCoordinate, entry: ChunkEntry) -> bool {
        if self.chunks.contains_key(&position) {
            trace!("Chunk {:?} already loaded, ignoring duplicate", position);
            return false;
        }
        self.chunks.insert(position, entry);
        true
    }

    /// Whether a chunk is registered at `position`.
    #[inline]
    pub fn is_loaded(&self, position: ChunkCoordinate) -> bool {
        self.chunks.contains_key(&position)
    }

    /// Retrieves the chunk at `position`.
    pub fn get_chunk(&self, position: ChunkCoordinate) -> Option<&ChunkEntry> {
        self.chunks.get(&position)
    }

    /// Retrieves the chunk at `position` for mutation.
    pub fn get_chunk_mut(&mut self, position: ChunkCoordinate) -> Option<&mut ChunkEntry> {
        self.chunks.get_mut(&position)
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Coordinates of every loaded chunk, sorted for stable iteration.
    pub fn loaded_coordinates(&self) -> Vec<ChunkCoordinate> {
        let mut coordinates: Vec<_> = self.chunks.keys().copied().collect();
        coordinates.sort_by_key(|c| (c.x, c.y));
        coordinates
    }

    /// Unregisters the chunk at `position`.
    pub fn remove(&mut self, position: ChunkCoordinate) -> Option<ChunkEntry> {
        self.chunks.remove(&position)
    }

    /// Removes every chunk, returning the coordinates that were loaded.
    pub fn clear(&mut self) -> Vec<ChunkCoordinate> {
        let coordinates = self.loaded_coordinates();
        self.chunks.clear();
        coordinates
    }

    /// Reads a block by world block position. Unloaded chunks and positions
    /// outside the vertical band read as air.
    pub fn block_at_world(&self, world: Point3<i32>, width: i32) -> Block {
        let (chunk, local) = world_to_chunk(world, width);
        self.chunks
            .get(&chunk)
            .and_then(|entry| entry.grid.get_at(local))
            .unwrap_or(Block::AIR)
    }
}

/// Answers block queries relative to one chunk, following positions that
/// step over its horizontal edges into the neighbouring chunk.
///
/// The chunk's own grid is passed in separately so a chunk that is still being
/// built (and therefore not yet registered) can be meshed against its loaded
/// neighbors.
pub struct NeighborResolver<'a> {
    world: &'a World,
    position: ChunkCoordinate,
    grid: &'a BlockGrid,
}

impl<'a> NeighborResolver<'a> {
    /// Creates a resolver for the chunk at `position` whose blocks are `grid`.
    pub fn new(world: &'a World, position: ChunkCoordinate, grid: &'a BlockGrid) -> Self {
        NeighborResolver {
            world,
            position,
            grid,
        }
    }

    /// Returns the block at a local position that may lie up to one block
    /// outside the chunk.
    ///
    /// - Outside `[0, height)` vertically: air. Height is a hard world limit.
    /// - Outside `[0, width)` horizontally: the matching block of the adjacent
    ///   chunk, or air if that chunk is not loaded.
    pub fn block_at(&self, local: Point3<i32>) -> Block {
        if local.y < 0 || local.y as usize >= self.grid.height() {
            return Block::AIR;
        }

        if let Some(block) = self.grid.get_at(local) {
            return block;
        }

        let width = self.grid.width() as i32;
        let (neighbor, wrapped) = wrap_to_neighbor(self.position, local, width);
        match self.world.get_chunk(neighbor) {
            Some(entry) => entry.grid.get_at(wrapped).unwrap_or(Block::AIR),
            None => Block::AIR,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn entry(grid: BlockGrid) -> ChunkEntry {
        ChunkEntry {
            grid,
            origin: Point3::new(0.0, 0.0, 0.0),
            mesh: GeneratedMesh::default(),
        }
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut world = World::new();
        let origin = Point2::new(0, 0);
        assert!(world.insert(origin, entry(BlockGrid::filled(2, 2, BlockType::STONE))));
        assert!(!world.insert(origin, entry(BlockGrid::new(2, 2))));
        assert_eq!(world.len(), 1);
        assert_eq!(world.get_chunk(origin).unwrap().grid.solid_count(), 8);
    }

    #[test]
    fn vertical_overflow_is_air_even_with_solid_neighbors() {
        let mut world = World::new();
        world.insert(Point2::new(0, 0), entry(BlockGrid::filled(4, 4, BlockType::STONE)));
        let grid = BlockGrid::filled(4, 4, BlockType::STONE);
        let resolver = NeighborResolver::new(&world, Point2::new(0, 0), &grid);
        assert_eq!(resolver.block_at(Point3::new(0, 4, 0)), Block::AIR);
        assert_eq!(resolver.block_at(Point3::new(0, -1, 0)), Block::AIR);
    }

    #[test]
    fn horizontal_overflow_reads_the_neighbor() {
        let mut world = World::new();
        let mut west = BlockGrid::new(4, 4);
        west.set(3, 1, 2, BlockType::GRASS);
        world.insert(Point2::new(-1, 0), entry(west));

        let grid = BlockGrid::new(4, 4);
        let resolver = NeighborResolver::new(&world, Point2::new(0, 0), &grid);
        assert_eq!(
            resolver.block_at(Point3::new(-1, 1, 2)),
            Block::new(BlockType::GRASS)
        );
        assert_eq!(resolver.block_at(Point3::new(-1, 1, 1)), Block::AIR);
    }

    #[test]
    fn missing_neighbor_is_air() {
        let world = World::new();
        let grid = BlockGrid::filled(4, 4, BlockType::STONE);
        let resolver = NeighborResolver::new(&world, Point2::new(0, 0), &grid);
        assert_eq!(resolver.block_at(Point3::new(4, 0, 0)), Block::AIR);
        assert_eq!(resolver.block_at(Point3::new(0, 0, -1)), Block::AIR);
        assert_eq!(
            resolver.block_at(Point3::new(0, 0, 0)),
            Block::new(BlockType::STONE)
        );
    }

    #[test]
    fn world_reads_follow_floor_division() {
        let mut world = World::new();
        let mut grid = BlockGrid::new(4, 4);
        grid.set(3, 0, 3, BlockType::WOOD);
        world.insert(Point2::new(-1, -1), entry(grid));
        assert_eq!(
            world.block_at_world(Point3::new(-1, 0, -1), 4),
            Block::new(BlockType::WOOD)
        );
        assert_eq!(world.block_at_world(Point3::new(-1, 9, -1), 4), Block::AIR);
        assert_eq!(world.block_at_world(Point3::new(3, 0, 3), 4), Block::AIR);
    }

    #[test]
    fn clear_reports_what_was_loaded() {
        let mut world = World::new();
        world.insert(Point2::new(1, 0), entry(BlockGrid::new(1, 1)));
        world.insert(Point2::new(0, 0), entry(BlockGrid::new(1, 1)));
        assert_eq!(world.clear(), vec![Point2::new(0, 0), Point2::new(1, 0)]);
        assert!(world.is_empty());
    }
}
