//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which loads one chunk: it
//! generates the block grid, builds the first mesh against whatever neighbours
//! are loaded, registers the chunk and hands the mesh to the renderer. The
//! loaded face neighbours are then rebuilt, since their rim faces toward the
//! new chunk were built against air. The task is scheduled when the viewer's
//! surroundings contain unloaded chunks.

use log::{debug, trace};
use web_time::Instant;

use crate::{
    engine_state::{
        task_management::task::{Task, TaskContext, TaskOutcome},
        voxels::{
            chunk::{adjacent_chunks, chunk_origin, ChunkCoordinate},
            world::ChunkEntry,
        },
    },
    error::VoxelResult,
};

/// A task that loads the chunk at one coordinate.
///
/// The task is responsible for:
/// 1. Generating the chunk's blocks from the terrain generator
/// 2. Building its mesh before anyone else can see the chunk
/// 3. Adding the chunk to the world and attaching its mesh
/// 4. Rebuilding and re-attaching every loaded face neighbour
///
/// Running the task for a coordinate that is already loaded does nothing.
#[derive(Debug, Clone, Copy)]
pub struct ChunkGenerationTask {
    /// The chunk coordinate to load
    position: ChunkCoordinate,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates where the chunk should be generated
    pub fn new(position: ChunkCoordinate) -> Self {
        ChunkGenerationTask { position }
    }

    /// The coordinate this task loads.
    pub fn position(&self) -> ChunkCoordinate {
        self.position
    }
}

impl Task for ChunkGenerationTask {
    /// Loads the chunk.
    ///
    /// # Returns
    /// [`TaskOutcome::Skipped`] if the chunk was already loaded,
    /// [`TaskOutcome::Completed`] otherwise.
    ///
    /// # Errors
    /// Meshing errors abort the load. An error building the new chunk leaves
    /// it unregistered; an error rebuilding a neighbour leaves the new chunk
    /// loaded and the remaining neighbours untouched.
    fn process(&self, context: &mut TaskContext<'_>) -> VoxelResult<TaskOutcome> {
        let position = self.position;
        if context.world.is_loaded(position) {
            trace!("Chunk {:?} already loaded", position);
            return Ok(TaskOutcome::Skipped);
        }

        let started = Instant::now();
        let origin = chunk_origin(position, context.chunk_config.world_width());
        let grid = context.terrain.generate_chunk(position);
        let mesh = context.mesh_builder.build(position, &grid, context.world)?;

        debug!(
            "Loaded chunk {:?} in {:?}: {} quads",
            position,
            started.elapsed(),
            mesh.quad_count()
        );
        context.renderer.attach_mesh(position, &mesh);
        context.world.insert(position, ChunkEntry { grid, origin, mesh });

        for neighbor in adjacent_chunks(position) {
            if let Some(mesh) = context.mesh_builder.rebuild(neighbor, context.world)? {
                context.renderer.attach_mesh(neighbor, mesh);
            }
        }

        Ok(TaskOutcome::Completed)
    }
}
