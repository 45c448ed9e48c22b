//! Mesh generation for voxel chunks.
//!
//! This module turns a chunk's block grid into the geometry of its visible
//! faces. A face is visible when the block on the other side of it is air,
//! including blocks above or below the world and blocks in chunks that are
//! not loaded. Neighbor lookups go through [`NeighborResolver`], so faces on a
//! chunk's rim are culled against the adjacent chunk's blocks.
//!
//! # Algorithm
//! Every position is scanned (y outer, then x, then z). For a solid block each
//! of the six sides is tested in [`BlockSide::all`] order and one quad is
//! emitted per side that faces air. Afterwards normals and bounds are
//! recomputed, and the mesh is optionally compacted.
//!
//! # Performance Considerations
//! - Faces are emitted one quad each; no merging of coplanar faces
//! - The whole chunk is rebuilt on every change

use cgmath::Point3;
use log::trace;

use crate::{
    engine_state::{
        config::{ChunkConfig, MeshConfig, UvRect},
        voxels::{
            block::{block_side::BlockSide, block_type::BlockType, Block},
            chunk::{BlockGrid, ChunkCoordinate},
            world::{NeighborResolver, World},
        },
    },
    error::{VoxelError, VoxelResult},
};

/// Core mesh data structures.
mod mesh;

pub use mesh::*;

/// Builds chunk meshes with a fixed block scale and texture table.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    block_scale: f32,
    mesh_config: MeshConfig,
}

impl MeshBuilder {
    /// Creates a builder from the chunk and mesh configuration.
    pub fn new(chunk_config: &ChunkConfig, mesh_config: MeshConfig) -> Self {
        MeshBuilder {
            block_scale: chunk_config.block_scale,
            mesh_config,
        }
    }

    /// Builds the mesh of the chunk at `position`.
    ///
    /// `grid` is the chunk's own blocks; it does not need to be registered in
    /// `world` yet. Neighbor chunks are read from `world`.
    ///
    /// # Errors
    /// Returns [`VoxelError::UnknownBlockType`] if a solid block has no entry
    /// in the UV table or holds an undecodable value. The mesh is discarded.
    pub fn build(
        &self,
        position: ChunkCoordinate,
        grid: &BlockGrid,
        world: &World,
    ) -> VoxelResult<GeneratedMesh> {
        let resolver = NeighborResolver::new(world, position, grid);
        let mut mesh = GeneratedMesh::new();

        let width = grid.width() as i32;
        let height = grid.height() as i32;

        for y in 0..height {
            for x in 0..width {
                for z in 0..width {
                    let block_position = Point3::new(x, y, z);
                    let block = resolver.block_at(block_position);
                    if block.is_air() {
                        continue;
                    }
                    self.generate_block(&resolver, block_position, block, &mut mesh)?;
                }
            }
        }

        mesh.recalculate_normals();
        mesh.recalculate_bounds();
        if self.mesh_config.compact_vertices {
            mesh.compact();
        }

        trace!(
            "Built mesh for chunk {:?}: {} quads",
            position,
            mesh.quad_count()
        );
        Ok(mesh)
    }

    /// Rebuilds the mesh of a registered chunk in place.
    ///
    /// # Returns
    /// The new mesh, or `None` if no chunk is loaded at `position`.
    pub fn rebuild<'w>(
        &self,
        position: ChunkCoordinate,
        world: &'w mut World,
    ) -> VoxelResult<Option<&'w GeneratedMesh>> {
        let mesh = {
            let shared: &World = world;
            match shared.get_chunk(position) {
                Some(entry) => self.build(position, &entry.grid, shared)?,
                None => return Ok(None),
            }
        };

        Ok(world.get_chunk_mut(position).map(|entry| {
            entry.mesh = mesh;
            &entry.mesh
        }))
    }

    /// Whether blocks of `block_type` can be meshed. Air always can.
    pub fn can_mesh(&self, block_type: BlockType) -> bool {
        !block_type.is_solid() || self.mesh_config.uv_table.contains_key(&block_type)
    }

    /// Emits the visible faces of one solid block.
    fn generate_block(
        &self,
        resolver: &NeighborResolver<'_>,
        block_position: Point3<i32>,
        block: Block,
        mesh: &mut GeneratedMesh,
    ) -> VoxelResult<()> {
        let mut uv_rect = None;

        for side in BlockSide::all() {
            if !resolver.block_at(block_position + side.offset()).is_air() {
                continue;
            }
            // Looked up lazily so fully buried blocks skip the table.
            let rect = match uv_rect {
                Some(rect) => rect,
                None => {
                    let rect = self.uv_rect(block)?;
                    uv_rect = Some(rect);
                    rect
                }
            };
            mesh.add_face(&Face::new(block_position, side, &rect, self.block_scale));
        }

        Ok(())
    }

    /// The atlas rectangle of a block's type.
    fn uv_rect(&self, block: Block) -> VoxelResult<UvRect> {
        let block_type = block.block_type()?;
        self.mesh_config
            .uv_table
            .get(&block_type)
            .copied()
            .ok_or(VoxelError::UnknownBlockType(block.block_type))
    }
}
