//! # Engine Configuration
//!
//! All tunables of the voxel core live in [`EngineConfig`]. The struct is plain
//! serde data so it can be loaded from a JSON file; every field has a default,
//! and a partial file only overrides what it names.
//!
//! ```json
//! {
//!     "chunk": { "width": 16, "height": 96 },
//!     "streaming": { "view_radius": 3, "load_delay_ms": 20 },
//!     "terrain": {
//!         "base_height": 20.0,
//!         "octaves": [
//!             { "kind": "Perlin", "frequency": 0.02, "amplitude": 24.0 },
//!             { "kind": "Simplex", "frequency": 0.1, "amplitude": 4.0 }
//!         ],
//!         "domain_warp": { "kind": "OpenSimplex", "frequency": 0.01, "amplitude": 12.0 }
//!     }
//! }
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use log::info;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{VoxelError, VoxelResult};

use super::voxels::{block::block_type::BlockType, terrain::NoiseKind};

/// Upper bound on blocks stored per chunk.
pub const MAX_CHUNK_BLOCKS: usize = 1 << 24;
/// Upper bound on the view radius, in chunks.
pub const MAX_VIEW_RADIUS: i32 = 256;

/// Top-level configuration for the voxel core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk dimensions and block scale
    pub chunk: ChunkConfig,
    /// Procedural terrain parameters
    pub terrain: TerrainConfig,
    /// Streaming radius and throttling
    pub streaming: StreamingConfig,
    /// Mesh output options
    pub mesh: MeshConfig,
}

/// Chunk dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Horizontal extent of a chunk in blocks (both x and z)
    pub width: usize,
    /// Vertical extent of a chunk in blocks; the hard world height
    pub height: usize,
    /// World units per block
    pub block_scale: f32,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        ChunkConfig {
            width: 10,
            height: 128,
            block_scale: 1.0,
        }
    }
}

impl ChunkConfig {
    /// Width of a chunk in world units.
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.block_scale
    }
}

/// One layer of noise: which algorithm, how fast it varies, how much it moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseOctaveSettings {
    /// Noise algorithm
    pub kind: NoiseKind,
    /// Coordinate multiplier applied before sampling
    pub frequency: f64,
    /// Output multiplier (for the warp: displacement distance)
    pub amplitude: f64,
}

impl Default for NoiseOctaveSettings {
    fn default() -> Self {
        NoiseOctaveSettings {
            kind: NoiseKind::Perlin,
            frequency: 0.2,
            amplitude: 1.0,
        }
    }
}

/// Terrain generator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed shared by all noise layers; each layer derives its own from it
    pub seed: u32,
    /// Height (world units) the octaves are added to
    pub base_height: f64,
    /// Octaves summed into the height, in order
    pub octaves: Vec<NoiseOctaveSettings>,
    /// Optional warp applied to the sampling coordinate before the octaves
    pub domain_warp: Option<NoiseOctaveSettings>,
    /// Thickness (world units) of the grass layer under the surface
    pub grass_layer_height: f64,
    /// Thickness (world units) of the bedrock layer at y = 0
    pub bedrock_layer_height: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            seed: 1337,
            base_height: 8.0,
            octaves: vec![NoiseOctaveSettings::default()],
            domain_warp: None,
            grass_layer_height: 1.0,
            bedrock_layer_height: 0.5,
        }
    }
}

/// Streaming parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunks are kept loaded in `[-R, R)` around the viewer chunk on both axes
    pub view_radius: i32,
    /// Minimum time between two throttled chunk loads
    pub load_delay_ms: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            view_radius: 5,
            load_delay_ms: 50,
        }
    }
}

impl StreamingConfig {
    /// The inter-load delay as a `Duration`.
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

/// Rectangle of the texture atlas, in normalized UV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    /// Lower corner
    pub min: [f32; 2],
    /// Upper corner
    pub max: [f32; 2],
}

impl UvRect {
    /// Creates a rectangle from its two corners.
    pub const fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        UvRect { min, max }
    }
}

/// Mesh output options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Merge identical vertices after building. Saves memory, but the output
    /// no longer has exactly four vertices per quad.
    pub compact_vertices: bool,
    /// Atlas rectangle for every solid block type
    pub uv_table: BTreeMap<BlockType, UvRect>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        // 2x2 atlas
        let uv_table = BTreeMap::from([
            (BlockType::STONE, UvRect::new([0.0, 0.0], [0.5, 0.5])),
            (BlockType::GRASS, UvRect::new([0.5, 0.0], [1.0, 0.5])),
            (BlockType::WOOD, UvRect::new([0.0, 0.5], [0.5, 1.0])),
            (BlockType::DIRT, UvRect::new([0.5, 0.5], [1.0, 1.0])),
        ]);
        MeshConfig {
            compact_vertices: false,
            uv_table,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> VoxelResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> VoxelResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks the invariants the rest of the crate relies on.
    pub fn validate(&self) -> VoxelResult<()> {
        let invalid = |msg: String| Err(VoxelError::InvalidConfig(msg));

        if self.chunk.width == 0 || self.chunk.height == 0 {
            return invalid(format!(
                "chunk dimensions must be non-zero, got {}x{}",
                self.chunk.width, self.chunk.height
            ));
        }
        let blocks = self
            .chunk
            .width
            .checked_mul(self.chunk.width)
            .and_then(|area| area.checked_mul(self.chunk.height));
        if !matches!(blocks, Some(blocks) if blocks <= MAX_CHUNK_BLOCKS) {
            return invalid(format!(
                "chunk of {}x{}x{} blocks exceeds the limit of {} blocks",
                self.chunk.width, self.chunk.height, self.chunk.width, MAX_CHUNK_BLOCKS
            ));
        }
        if !(self.chunk.block_scale.is_finite() && self.chunk.block_scale > 0.0) {
            return invalid(format!(
                "block scale must be positive, got {}",
                self.chunk.block_scale
            ));
        }
        if !(0..=MAX_VIEW_RADIUS).contains(&self.streaming.view_radius) {
            return invalid(format!(
                "view radius must be in 0..={}, got {}",
                MAX_VIEW_RADIUS, self.streaming.view_radius
            ));
        }
        if !self.terrain.base_height.is_finite() {
            return invalid("base height must be finite".to_string());
        }
        for (i, octave) in self
            .terrain
            .octaves
            .iter()
            .chain(self.terrain.domain_warp.iter())
            .enumerate()
        {
            if !(octave.frequency.is_finite() && octave.amplitude.is_finite()) {
                return invalid(format!("noise layer {i} has a non-finite parameter"));
            }
        }
        if let Some(missing) = BlockType::SOLID
            .iter()
            .find(|block_type| !self.mesh.uv_table.contains_key(block_type))
        {
            return invalid(format!("uv table has no entry for {missing:?}"));
        }

        Ok(())
    }
}
