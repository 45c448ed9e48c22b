#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Core
//!
//! The headless core of a chunked voxel world: block storage, procedural
//! terrain, face-culled meshing and a throttled chunk streamer that follows a
//! moving viewer.
//!
//! ## Key Modules
//!
//! * `engine_state` - The streamer and every subsystem it drives
//! * `error` - The crate error type
//!
//! ## Architecture
//!
//! The crate keeps a clear separation between:
//! * Voxel data (blocks, chunk grids, the world registry)
//! * Content (terrain generation from layered noise)
//! * Geometry (meshes built from grids, handed to a [`ChunkRenderer`])
//! * Scheduling (a task queue that spreads chunk loads over frames)
//!
//! Rendering itself is out of scope: the host implements [`ChunkRenderer`]
//! and receives finished meshes.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_core::{BlockEdit, BlockType, EngineConfig, EngineState, LoggingRenderer};
//! use web_time::Duration;
//!
//! let mut config = EngineConfig::default();
//! config.streaming.view_radius = 2;
//! let mut engine = EngineState::new(config, Box::new(LoggingRenderer::new())).unwrap();
//!
//! let mut viewer = Point3::new(0.0, 30.0, 0.0);
//! engine.start(viewer).unwrap();
//! for _ in 0..60 {
//!     viewer.x += 0.5;
//!     engine.tick(viewer, Duration::from_millis(16)).unwrap();
//! }
//!
//! engine
//!     .apply_edit(Point3::new(1, 2, 1), BlockEdit::Place(BlockType::DIRT))
//!     .unwrap();
//! engine.shutdown();
//! ```

pub mod engine_state;
pub mod error;

pub use engine_state::{
    config::{
        ChunkConfig, EngineConfig, MeshConfig, NoiseOctaveSettings, StreamingConfig,
        TerrainConfig, UvRect,
    },
    rendering::{
        meshing::{Bounds, GeneratedMesh, MeshBuilder},
        ChunkRenderer, LoggingRenderer, NullRenderer,
    },
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType, Block},
        chunk::{BlockGrid, ChunkCoordinate},
        terrain::{NoiseKind, TerrainGenerator},
        world::World,
    },
    BlockEdit, EngineState,
};
pub use error::{VoxelError, VoxelResult};

/// Initialises `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    let _ = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}
