//! # Error Module
//!
//! Errors surfaced by the voxel core. Recoverable lookups (blocks above or below
//! the world, blocks inside chunks that are not loaded yet, duplicate load
//! requests) never reach this type: they resolve to air or to a no-op where
//! they happen.

use thiserror::Error;

/// Errors produced by the voxel core.
#[derive(Debug, Error)]
pub enum VoxelError {
    /// A block value reached texture lookup without a known mapping.
    ///
    /// This is a data-integrity violation: grids only ever hold recognised
    /// block types, so hitting this means either the grid or the UV table is
    /// corrupt. It is not retried.
    #[error("unknown block type {0} has no texture mapping")]
    UnknownBlockType(u8),

    /// An edit targeted a block outside the fixed vertical band of the world.
    #[error("block y={y} is outside the world height 0..{height}")]
    OutOfVerticalRange {
        /// Requested y coordinate
        y: i32,
        /// Configured chunk height
        height: usize,
    },

    /// An edit targeted a chunk that has not been loaded.
    #[error("chunk ({0}, {1}) is not loaded")]
    ChunkNotLoaded(i32, i32),

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `EngineConfig`.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type used throughout the voxel core.
pub type VoxelResult<T> = Result<T, VoxelError>;
