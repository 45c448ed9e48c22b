//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion from
//! the compact storage format.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{VoxelError, VoxelResult};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// `AIR` is the universal empty sentinel and the zero value of the storage
/// format, so a freshly allocated grid is entirely air. Every other variant is
/// solid and maps to a rectangle of the texture atlas.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, Serialize, Deserialize,
)]
pub enum BlockType {
    /// An air block, which is non-solid and invisible.
    AIR = 0,

    /// Plain stone, the bulk of generated terrain.
    STONE = 1,

    /// The surface layer of generated terrain.
    GRASS = 2,

    /// Bedrock placeholder used for the bottom layer of generated terrain.
    WOOD = 3,

    /// Dirt, only produced by edits.
    DIRT = 4,
}

impl BlockType {
    /// Every solid block type, in storage order.
    pub const SOLID: [BlockType; 4] = [
        BlockType::STONE,
        BlockType::GRASS,
        BlockType::WOOD,
        BlockType::DIRT,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Errors
    /// Returns [`VoxelError::UnknownBlockType`] if the value does not name a
    /// variant.
    pub fn from_int(btype: BlockTypeSize) -> VoxelResult<Self> {
        FromPrimitive::from_u8(btype).ok_or(VoxelError::UnknownBlockType(btype))
    }

    /// Returns `true` for every type except `AIR`.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }
}
