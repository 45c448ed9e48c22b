//! # Task System Core Traits
//!
//! This module defines the building blocks of the task system: a [`Task`] is
//! one discrete step of streaming work, and a [`TaskContext`] lends it the
//! engine state it needs for the duration of that step.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and queued via `TaskManager::publish_task()`
//! 2. The manager pops it on a scheduling tick once the load delay has elapsed
//! 3. The task's `process()` method runs to completion against the context
//! 4. The returned [`TaskOutcome`] tells the manager whether the tick's slot
//!    was used
//!
//! ## Execution Model
//! Tasks run on the same thread as the update loop. Each `process()` call is
//! atomic with respect to the world: nothing else observes the world while it
//! runs.

use crate::{
    engine_state::{
        config::ChunkConfig,
        rendering::{meshing::MeshBuilder, ChunkRenderer},
        voxels::{terrain::TerrainGenerator, world::World},
    },
    error::VoxelResult,
};

/// Everything a task may read or mutate while it runs.
pub struct TaskContext<'a> {
    /// The chunk registry
    pub world: &'a mut World,
    /// Source of new block grids
    pub terrain: &'a TerrainGenerator,
    /// Builds chunk meshes against the registry
    pub mesh_builder: &'a MeshBuilder,
    /// Receives finished meshes
    pub renderer: &'a mut dyn ChunkRenderer,
    /// Chunk dimensions
    pub chunk_config: &'a ChunkConfig,
}

/// What running a task amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task did its work
    Completed,
    /// The task found nothing left to do, e.g. its chunk was already loaded
    Skipped,
}

/// A unit of deferred work.
///
/// # Implementation Guidelines
/// - Must own everything it needs besides the context
/// - Must tolerate running after the world changed under it: a task whose
///   target is already satisfied returns [`TaskOutcome::Skipped`]
pub trait Task {
    /// Runs the task against the engine state.
    ///
    /// # Returns
    /// Whether the task did any work, or the error that aborted it.
    fn process(&self, context: &mut TaskContext<'_>) -> VoxelResult<TaskOutcome>;
}
