//! Mesh generation for voxel rendering.
//!
//! This module provides the data structures that turn visible block faces into
//! GPU-friendly vertex, uv and index buffers.
//!
//! # Architecture
//! - [`GeneratedMesh`]: The buffers of one chunk plus normals and bounds
//! - [`Face`]: A single face of a voxel with its corners and atlas coordinates
//!
//! Faces are emitted one quad per visible block side; coplanar faces are never
//! merged.

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
