//! # Terrain Generation
//!
//! Derives the block grid of a chunk from layered 2D noise.
//!
//! For every column the world-space sampling point is optionally displaced by
//! a domain-warp field, then the configured octaves are summed onto the base
//! height:
//!
//! ```text
//! height = base_height + Σ octave.sample(warped) * octave.amplitude / 2
//! ```
//!
//! The column is filled from y = 0 while `y * block_scale < height`: the top
//! layer is grass, a thin bottom layer is bedrock (stored as wood), the rest is
//! stone.
//!
//! Generation is a pure function of the world offset and the configuration.
//! Adjacent chunks sample one continuous field at matching world coordinates,
//! so their shared edge never shows a step.

use log::debug;

use crate::engine_state::config::{ChunkConfig, TerrainConfig};

use super::{
    block::block_type::BlockType,
    chunk::{BlockGrid, ChunkCoordinate},
};

mod sampler;

pub use sampler::{NoiseKind, Sampler};

/// Seed offset of the domain-warp field relative to the terrain seed.
const WARP_SEED_OFFSET: u32 = 0x5EED;
/// Decorrelates the two warp axes sampled from one field.
const WARP_AXIS_OFFSET: (f64, f64) = (5.2, 1.3);

/// Builds block grids from noise.
pub struct TerrainGenerator {
    config: TerrainConfig,
    chunk: ChunkConfig,
    octaves: Vec<Sampler>,
    warp: Option<Sampler>,
}

impl TerrainGenerator {
    /// Creates a generator and initialises its noise state.
    pub fn new(config: TerrainConfig, chunk: ChunkConfig) -> Self {
        let mut generator = TerrainGenerator {
            config,
            chunk,
            octaves: Vec::new(),
            warp: None,
        };
        generator.reinitialize();
        generator
    }

    /// Rebuilds every noise source from the configuration.
    pub fn reinitialize(&mut self) {
        let seed = self.config.seed;
        self.octaves = self
            .config
            .octaves
            .iter()
            .enumerate()
            .map(|(i, settings)| Sampler::new(settings, seed.wrapping_add(i as u32)))
            .collect();
        self.warp = self
            .config
            .domain_warp
            .as_ref()
            .map(|settings| Sampler::new(settings, seed.wrapping_add(WARP_SEED_OFFSET)));

        debug!(
            "Terrain generator initialised: seed {}, {} octaves, warp {}",
            seed,
            self.octaves.len(),
            if self.warp.is_some() { "on" } else { "off" }
        );
    }

    /// Replaces the terrain parameters and reinitialises.
    pub fn reconfigure(&mut self, config: TerrainConfig) {
        self.config = config;
        self.reinitialize();
    }

    /// The current terrain parameters.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Terrain height, in world units, at a world-space point.
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        let (x, z) = self.warp_point(x, z);

        self.octaves.iter().fold(self.config.base_height, |height, octave| {
            height + octave.sample(x, z) * octave.amplitude() / 2.0
        })
    }

    /// Displaces a sampling point by the domain-warp field, if one is set.
    fn warp_point(&self, x: f64, z: f64) -> (f64, f64) {
        match &self.warp {
            Some(warp) => {
                let dx = warp.sample(x, z);
                let dz = warp.sample(x + WARP_AXIS_OFFSET.0, z + WARP_AXIS_OFFSET.1);
                (x + dx * warp.amplitude(), z + dz * warp.amplitude())
            }
            None => (x, z),
        }
    }

    /// Generates the grid of the chunk at `position`.
    pub fn generate_chunk(&self, position: ChunkCoordinate) -> BlockGrid {
        let world_width = self.chunk.world_width() as f64;
        self.generate(
            position.x as f64 * world_width,
            position.y as f64 * world_width,
        )
    }

    /// Generates the grid of the chunk whose world origin is
    /// `(x_offset, z_offset)`.
    pub fn generate(&self, x_offset: f64, z_offset: f64) -> BlockGrid {
        let width = self.chunk.width;
        let height = self.chunk.height;
        let scale = self.chunk.block_scale as f64;
        let mut grid = BlockGrid::new(width, height);

        for x in 0..width {
            for z in 0..width {
                let column_height =
                    self.height_at(x as f64 * scale + x_offset, z as f64 * scale + z_offset);

                for y in 0..height {
                    let bottom = y as f64 * scale;
                    if bottom >= column_height {
                        break;
                    }
                    let block_type = self.classify(column_height, bottom);
                    grid.set(x as i32, y as i32, z as i32, block_type);
                }
            }
        }

        grid
    }

    /// Block type of a cell whose bottom sits at `bottom` in a column of
    /// height `column_height`.
    fn classify(&self, column_height: f64, bottom: f64) -> BlockType {
        if column_height - bottom < self.config.grass_layer_height {
            BlockType::GRASS
        } else if bottom < self.config.bedrock_layer_height {
            BlockType::WOOD
        } else {
            BlockType::STONE
        }
    }
}
