//! # Engine State Module
//!
//! The core engine module that ties the voxel subsystems together into a chunk
//! streamer.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world, the terrain generator, the mesh builder,
//!   the renderer and the task queue, and drives them from `tick`
//! * `config` - Serializable tunables for every subsystem
//! * `rendering` - Mesh construction and the renderer interface
//! * `task_management` - Throttled execution of chunk loads
//! * `voxels` - Blocks, chunks, the world registry and terrain generation
//!
//! ## Streaming
//!
//! A chunk is either absent from the world (unloaded), queued, or loaded.
//! Loading is atomic: grid generation and the first mesh build both finish
//! before the chunk becomes visible to anyone else.
//!
//! The startup pass loads every chunk in `[-R, R)²` around the viewer chunk
//! without delay. It registers all of its grids before building any mesh, so
//! the square comes up without seams between its chunks. After that, every
//! tick recomputes the viewer chunk and, when it changed, queues loads for the
//! chunks that are missing around it. Queued loads run at most one per tick
//! with the configured delay in between, and each one rebuilds the loaded
//! chunks next to it. Passes may overlap; a load whose chunk is already
//! present is skipped.
//!
//! Chunks are never evicted. Only `regenerate` and `shutdown` remove them.
//!
//! ## Edits
//!
//! An edit rewrites one block and rebuilds the owning chunk's mesh, then the
//! mesh of every loaded chunk sharing a face with the edited block. Edits run
//! synchronously and either land completely or leave the world unchanged.

use std::collections::HashSet;

use cgmath::Point3;
use log::{debug, info};
use web_time::Duration;

use crate::error::{VoxelError, VoxelResult};

use config::{EngineConfig, TerrainConfig};
use rendering::{
    meshing::{GeneratedMesh, MeshBuilder},
    ChunkRenderer,
};
use task_management::{task::TaskContext, TaskManager};
use voxels::{
    block::{block_type::BlockType, Block},
    chunk::{
        adjacent_chunks, boundary_neighbors, chunk_of_world_position, chunk_origin,
        chunks_in_radius, world_to_chunk, ChunkCoordinate,
    },
    tasks::chunk_generation_task::ChunkGenerationTask,
    terrain::TerrainGenerator,
    world::{ChunkEntry, World},
};

pub mod config;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// A change to a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEdit {
    /// Writes a block of the given type. Placing air removes.
    Place(BlockType),
    /// Clears the block to air.
    Remove,
}

impl BlockEdit {
    /// The block type the edit writes.
    pub fn block_type(self) -> BlockType {
        match self {
            BlockEdit::Place(block_type) => block_type,
            BlockEdit::Remove => BlockType::AIR,
        }
    }
}

/// The chunk streamer.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_core::{EngineConfig, EngineState, NullRenderer};
/// use web_time::Duration;
///
/// let mut config = EngineConfig::default();
/// config.streaming.view_radius = 1;
/// let mut engine = EngineState::new(config, Box::new(NullRenderer)).unwrap();
///
/// let viewer = Point3::new(0.0, 20.0, 0.0);
/// engine.start(viewer).unwrap();
/// assert_eq!(engine.loaded_count(), 4);
///
/// // Once per frame:
/// engine.tick(viewer, Duration::from_millis(16)).unwrap();
/// ```
pub struct EngineState {
    config: EngineConfig,
    /// The registry of loaded chunks
    world: World,
    terrain: TerrainGenerator,
    mesh_builder: MeshBuilder,
    renderer: Box<dyn ChunkRenderer>,
    /// Pending chunk loads
    task_manager: TaskManager,
    /// Chunk the viewer stood in at the last tick
    viewer_chunk: ChunkCoordinate,
    started: bool,
}

impl EngineState {
    /// Creates a streamer with nothing loaded.
    ///
    /// # Arguments
    /// * `config` - Engine configuration; validated here
    /// * `renderer` - Receives every mesh the streamer produces
    ///
    /// # Errors
    /// [`VoxelError::InvalidConfig`] if the configuration is unusable.
    pub fn new(config: EngineConfig, renderer: Box<dyn ChunkRenderer>) -> VoxelResult<Self> {
        config.validate()?;

        let terrain = TerrainGenerator::new(config.terrain.clone(), config.chunk);
        let mesh_builder = MeshBuilder::new(&config.chunk, config.mesh.clone());
        let task_manager = TaskManager::new(config.streaming.load_delay());

        Ok(EngineState {
            config,
            world: World::new(),
            terrain,
            mesh_builder,
            renderer,
            task_manager,
            viewer_chunk: ChunkCoordinate::new(0, 0),
            started: false,
        })
    }

    /// Runs the startup pass: loads every chunk around the viewer at once.
    ///
    /// Loads still queued from earlier ticks are cancelled.
    ///
    /// # Errors
    /// Propagates meshing errors; no chunk of the failed pass stays loaded.
    pub fn start(&mut self, viewer: Point3<f32>) -> VoxelResult<()> {
        self.viewer_chunk = chunk_of_world_position(viewer, self.config.chunk.world_width());
        self.started = true;

        let loaded = self.load_all_around_viewer()?;
        info!(
            "Startup pass around chunk {:?} loaded {} chunks",
            self.viewer_chunk, loaded
        );
        Ok(())
    }

    /// Advances streaming by one frame.
    ///
    /// Calling `tick` before [`start`](Self::start) runs the startup pass.
    ///
    /// # Arguments
    /// * `viewer` - The viewer's world-space position this frame
    /// * `dt` - Time since the previous tick
    ///
    /// # Returns
    /// `true` if a chunk was loaded during this tick.
    pub fn tick(&mut self, viewer: Point3<f32>, dt: Duration) -> VoxelResult<bool> {
        if !self.started {
            self.start(viewer)?;
            return Ok(false);
        }

        let viewer_chunk = chunk_of_world_position(viewer, self.config.chunk.world_width());
        if viewer_chunk != self.viewer_chunk {
            debug!(
                "Viewer moved from chunk {:?} to {:?}",
                self.viewer_chunk, viewer_chunk
            );
            self.viewer_chunk = viewer_chunk;
            self.queue_missing_around_viewer();
        }

        let mut context = TaskContext {
            world: &mut self.world,
            terrain: &self.terrain,
            mesh_builder: &self.mesh_builder,
            renderer: self.renderer.as_mut(),
            chunk_config: &self.config.chunk,
        };
        self.task_manager.process_queued_tasks(dt, &mut context)
    }

    /// Writes one block and rebuilds every mesh the change can affect.
    ///
    /// # Arguments
    /// * `position` - World block position of the edited block
    /// * `edit` - What to write there
    ///
    /// # Returns
    /// The chunks whose meshes were rebuilt: the owning chunk first, then each
    /// loaded chunk sharing a face with the block.
    ///
    /// # Errors
    /// - [`VoxelError::OutOfVerticalRange`] if `position.y` is outside the world
    /// - [`VoxelError::ChunkNotLoaded`] if the owning chunk is not loaded
    /// - [`VoxelError::UnknownBlockType`] if the block or a rebuild has no
    ///   texture mapping; the block is left as it was
    pub fn apply_edit(
        &mut self,
        position: Point3<i32>,
        edit: BlockEdit,
    ) -> VoxelResult<Vec<ChunkCoordinate>> {
        let height = self.config.chunk.height;
        if position.y < 0 || position.y as usize >= height {
            return Err(VoxelError::OutOfVerticalRange {
                y: position.y,
                height,
            });
        }

        let block_type = edit.block_type();
        if !self.mesh_builder.can_mesh(block_type) {
            return Err(VoxelError::UnknownBlockType(block_type as u8));
        }

        let width = self.config.chunk.width as i32;
        let (chunk, local) = world_to_chunk(position, width);
        let entry = self
            .world
            .get_chunk_mut(chunk)
            .ok_or(VoxelError::ChunkNotLoaded(chunk.x, chunk.y))?;
        let previous = entry.grid.get_at(local).unwrap_or(Block::AIR).block_type()?;
        entry.grid.set_at(local, block_type);

        let mut dirty = vec![chunk];
        dirty.extend(
            boundary_neighbors(chunk, local, width)
                .into_iter()
                .filter(|neighbor| self.world.is_loaded(*neighbor)),
        );

        let meshes = match self.build_meshes(&dirty) {
            Ok(meshes) => meshes,
            Err(err) => {
                if let Some(entry) = self.world.get_chunk_mut(chunk) {
                    entry.grid.set_at(local, previous);
                }
                return Err(err);
            }
        };
        self.store_and_attach(meshes);

        debug!(
            "Edit {:?} at {:?} rebuilt {} chunks",
            edit,
            position,
            dirty.len()
        );
        Ok(dirty)
    }

    /// Discards every chunk, reseeds the terrain noise and reloads around the
    /// viewer without delay.
    pub fn regenerate(&mut self) -> VoxelResult<()> {
        self.discard_everything();
        self.terrain.reinitialize();

        let loaded = self.load_all_around_viewer()?;
        info!("Regenerated {} chunks", loaded);
        Ok(())
    }

    /// Like [`regenerate`](Self::regenerate), with new terrain parameters.
    ///
    /// # Errors
    /// [`VoxelError::InvalidConfig`] if the parameters are unusable; nothing
    /// is discarded in that case.
    pub fn regenerate_with(&mut self, terrain: TerrainConfig) -> VoxelResult<()> {
        let mut config = self.config.clone();
        config.terrain = terrain;
        config.validate()?;

        self.config = config;
        self.terrain.reconfigure(self.config.terrain.clone());
        self.regenerate()
    }

    /// Cancels pending loads, detaches every mesh and releases all chunks.
    ///
    /// The streamer can be started again afterwards.
    pub fn shutdown(&mut self) {
        let released = self.discard_everything();
        self.started = false;
        info!("Shut down, released {} chunks", released);
    }

    /// Whether the chunk at `position` is loaded.
    pub fn is_loaded(&self, position: ChunkCoordinate) -> bool {
        self.world.is_loaded(position)
    }

    /// The current mesh of a loaded chunk.
    pub fn mesh_data(&self, position: ChunkCoordinate) -> Option<&GeneratedMesh> {
        self.world.get_chunk(position).map(|entry| &entry.mesh)
    }

    /// Reads a block by world block position. Unloaded chunks read as air.
    pub fn block_at(&self, position: Point3<i32>) -> Block {
        self.world
            .block_at_world(position, self.config.chunk.width as i32)
    }

    /// Number of loaded chunks.
    pub fn loaded_count(&self) -> usize {
        self.world.len()
    }

    /// Number of queued chunk loads, including ones that will turn out to be
    /// redundant.
    pub fn pending_loads(&self) -> usize {
        self.task_manager.len()
    }

    /// The chunk the viewer was in at the last tick.
    pub fn viewer_chunk(&self) -> ChunkCoordinate {
        self.viewer_chunk
    }

    /// The chunk registry.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Chunks around the viewer chunk that are not loaded, in scan order.
    fn missing_around_viewer(&self) -> Vec<ChunkCoordinate> {
        chunks_in_radius(self.viewer_chunk, self.config.streaming.view_radius)
            .into_iter()
            .filter(|position| !self.world.is_loaded(*position))
            .collect()
    }

    fn queue_missing_around_viewer(&mut self) {
        let missing = self.missing_around_viewer();
        debug!("Queued {} chunk loads", missing.len());
        for position in missing {
            self.task_manager
                .publish_task(Box::new(ChunkGenerationTask::new(position)));
        }
    }

    /// Loads every missing chunk around the viewer in one go, replacing
    /// whatever was queued.
    fn load_all_around_viewer(&mut self) -> VoxelResult<usize> {
        self.task_manager.clear();
        let missing = self.missing_around_viewer();
        let world_width = self.config.chunk.world_width();

        // All grids go in before the first mesh is built.
        for &position in &missing {
            let entry = ChunkEntry {
                grid: self.terrain.generate_chunk(position),
                origin: chunk_origin(position, world_width),
                mesh: GeneratedMesh::new(),
            };
            self.world.insert(position, entry);
        }

        // Chunks loaded before the pass border the new ones too.
        let batch: HashSet<_> = missing.iter().copied().collect();
        let mut dirty = missing.clone();
        for &position in &missing {
            for neighbor in adjacent_chunks(position) {
                if !batch.contains(&neighbor)
                    && self.world.is_loaded(neighbor)
                    && !dirty.contains(&neighbor)
                {
                    dirty.push(neighbor);
                }
            }
        }

        match self.build_meshes(&dirty) {
            Ok(meshes) => self.store_and_attach(meshes),
            Err(err) => {
                for position in &missing {
                    self.world.remove(*position);
                }
                return Err(err);
            }
        }
        Ok(missing.len())
    }

    /// Builds fresh meshes for the loaded chunks among `positions` without
    /// touching the world.
    fn build_meshes(
        &self,
        positions: &[ChunkCoordinate],
    ) -> VoxelResult<Vec<(ChunkCoordinate, GeneratedMesh)>> {
        positions
            .iter()
            .filter_map(|&position| {
                self.world
                    .get_chunk(position)
                    .map(|entry| (position, &entry.grid))
            })
            .map(|(position, grid)| {
                let mesh = self.mesh_builder.build(position, grid, &self.world)?;
                Ok((position, mesh))
            })
            .collect()
    }

    /// Stores each mesh on its chunk and hands it to the renderer.
    fn store_and_attach(&mut self, meshes: Vec<(ChunkCoordinate, GeneratedMesh)>) {
        for (position, mesh) in meshes {
            if let Some(entry) = self.world.get_chunk_mut(position) {
                entry.mesh = mesh;
                self.renderer.attach_mesh(position, &entry.mesh);
            }
        }
    }

    /// Empties the queue and the world, detaching every mesh.
    fn discard_everything(&mut self) -> usize {
        self.task_manager.clear();
        let released = self.world.clear();
        for position in &released {
            self.renderer.detach_mesh(*position);
        }
        released.len()
    }
}
