//! Rendering interface of the voxel engine.
//!
//! The core never creates host render objects itself. Finished chunk meshes
//! are handed to a [`ChunkRenderer`], which may upload them to a GPU, feed a
//! collision system, or ignore them. Mesh construction lives in [`meshing`].

use std::collections::HashMap;

use log::{debug, info};

use super::voxels::chunk::ChunkCoordinate;

pub mod meshing;

use meshing::GeneratedMesh;

/// Receiver of chunk meshes.
///
/// `attach_mesh` is called when a chunk is loaded and again every time its
/// mesh is rebuilt; a renderer replaces whatever it held for that coordinate.
/// `detach_mesh` is called when the chunk is discarded.
pub trait ChunkRenderer {
    /// Shows (or replaces) the mesh of the chunk at `position`.
    fn attach_mesh(&mut self, position: ChunkCoordinate, mesh: &GeneratedMesh);

    /// Stops showing the chunk at `position`.
    fn detach_mesh(&mut self, position: ChunkCoordinate);
}

/// A renderer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl ChunkRenderer for NullRenderer {
    fn attach_mesh(&mut self, _position: ChunkCoordinate, _mesh: &GeneratedMesh) {}

    fn detach_mesh(&mut self, _position: ChunkCoordinate) {}
}

/// A headless renderer that logs what it is given and keeps running totals.
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    /// Quad count of every attached chunk
    attached: HashMap<ChunkCoordinate, usize>,
    uploads: usize,
    uploaded_bytes: usize,
}

impl LoggingRenderer {
    /// Creates an empty renderer.
    pub fn new() -> Self {
        LoggingRenderer::default()
    }

    /// Number of chunks currently attached.
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Quads across all attached chunks.
    pub fn attached_quads(&self) -> usize {
        self.attached.values().sum()
    }

    /// Total number of `attach_mesh` calls so far.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Total vertex and index bytes received so far.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    /// Forgets an attached chunk. Returns `true` only when this emptied the
    /// renderer.
    fn release(&mut self, position: ChunkCoordinate) -> bool {
        if self.attached.remove(&position).is_none() {
            return false;
        }
        debug!("Detached chunk {:?}", position);
        self.attached.is_empty()
    }
}

impl ChunkRenderer for LoggingRenderer {
    fn attach_mesh(&mut self, position: ChunkCoordinate, mesh: &GeneratedMesh) {
        let bytes = mesh.vertex_bytes().len() + mesh.index_bytes().len();
        let replaced = self.attached.insert(position, mesh.quad_count()).is_some();
        self.uploads += 1;
        self.uploaded_bytes += bytes;

        debug!(
            "{} chunk {:?}: {} quads, {} bytes",
            if replaced { "Replaced" } else { "Attached" },
            position,
            mesh.quad_count(),
            bytes
        );
    }

    fn detach_mesh(&mut self, position: ChunkCoordinate) {
        if self.release(position) {
            info!("All chunk meshes detached");
        }
    }
}
