//! # Voxel Engine Core
//!
//! This module contains the data side of the voxel engine: what a block is,
//! how blocks are stored, how chunks find each other and where their contents
//! come from.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Defines individual voxel types and the six face directions
//! * **Chunk**: Fixed-size 3D arrays of blocks and the coordinate arithmetic
//!   between world, chunk and local positions
//! * **World**: The registry of loaded chunks and cross-chunk block lookups
//! * **Terrain**: Procedural generation of chunk contents from layered noise
//! * **Tasks**: Deferred chunk loading driven by the task manager
//!
//! ## Data Flow
//!
//! 1. The streamer queues a load task for every missing chunk near the viewer
//! 2. The task generates the grid and builds its mesh against loaded neighbours
//! 3. The finished chunk is registered in the world and its mesh is attached
//! 4. Edits mutate a grid in place and rebuild the affected meshes

pub mod block;
pub mod chunk;
pub mod tasks;
pub mod terrain;
pub mod world;
