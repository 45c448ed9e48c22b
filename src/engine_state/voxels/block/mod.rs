//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and block data structures.

use block_type::BlockType;

use crate::error::VoxelResult;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the essential block data.
/// The actual block properties are looked up from the block type.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the layout stable so a grid can be viewed
/// as raw bytes. The all-zero value is `AIR`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Hash, Default)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// The empty block.
    pub const AIR: Block = Block { block_type: 0 };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Decodes the stored type.
    ///
    /// # Errors
    /// Fails with `UnknownBlockType` if the stored byte is not a valid variant.
    pub fn block_type(&self) -> VoxelResult<BlockType> {
        BlockType::from_int(self.block_type)
    }

    /// Whether this block occludes its neighbors' faces.
    ///
    /// Only the air byte is treated as empty, so a corrupt byte still counts as
    /// solid and is reported later by texture lookup.
    #[inline]
    pub fn is_air(&self) -> bool {
        self.block_type == BlockType::AIR as BlockTypeSize
    }
}

impl From<BlockType> for Block {
    fn from(block_type: BlockType) -> Self {
        Block::new(block_type)
    }
}
