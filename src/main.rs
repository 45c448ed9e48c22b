//! # Voxel Core Demo
//!
//! Headless driver for the chunk streamer. It streams terrain around a viewer
//! that walks along +x, applies a few random edits, regenerates the world once
//! and shuts down, logging what happened along the way.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::{cell::RefCell, env, process::ExitCode, rc::Rc};

use cgmath::Point3;
use log::{error, info, warn};
use voxel_core::{
    BlockEdit, BlockType, ChunkCoordinate, ChunkRenderer, EngineConfig, EngineState,
    GeneratedMesh, LoggingRenderer, VoxelError, VoxelResult,
};
use web_time::{Duration, Instant};

/// Simulated frame time.
const FRAME: Duration = Duration::from_millis(16);
/// Frames the viewer spends walking.
const WALK_FRAMES: u32 = 600;
/// World units the viewer moves per frame.
const WALK_SPEED: f32 = 0.25;
/// Random edits applied after the walk.
const EDIT_COUNT: usize = 16;

/// Shares the logging renderer with `main` so totals can be read at the end.
struct SharedRenderer(Rc<RefCell<LoggingRenderer>>);

impl ChunkRenderer for SharedRenderer {
    fn attach_mesh(&mut self, position: ChunkCoordinate, mesh: &GeneratedMesh) {
        self.0.borrow_mut().attach_mesh(position, mesh);
    }

    fn detach_mesh(&mut self, position: ChunkCoordinate) {
        self.0.borrow_mut().detach_mesh(position);
    }
}

fn main() -> ExitCode {
    voxel_core::init_logger();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> VoxelResult<()> {
    let config = match env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => {
            info!("No configuration given, using defaults");
            EngineConfig::default()
        }
    };

    let renderer = Rc::new(RefCell::new(LoggingRenderer::new()));
    let mut engine = EngineState::new(config, Box::new(SharedRenderer(renderer.clone())))?;

    let mut viewer = Point3::new(0.0, engine.config().chunk.height as f32, 0.0);
    let started = Instant::now();
    engine.start(viewer)?;
    info!(
        "Startup pass: {} chunks in {:?}",
        engine.loaded_count(),
        started.elapsed()
    );

    let walk_started = Instant::now();
    let mut streamed = 0;
    for _ in 0..WALK_FRAMES {
        viewer.x += WALK_SPEED;
        if engine.tick(viewer, FRAME)? {
            streamed += 1;
        }
    }
    info!(
        "Walked to chunk {:?}: streamed {} chunks in {:?}, {} still queued",
        engine.viewer_chunk(),
        streamed,
        walk_started.elapsed(),
        engine.pending_loads()
    );

    apply_random_edits(&mut engine)?;

    let regenerate_started = Instant::now();
    engine.regenerate()?;
    info!(
        "Regenerated {} chunks in {:?}",
        engine.loaded_count(),
        regenerate_started.elapsed()
    );

    {
        let renderer = renderer.borrow();
        info!(
            "Renderer totals: {} uploads, {} bytes, {} chunks showing {} quads",
            renderer.uploads(),
            renderer.uploaded_bytes(),
            renderer.attached_count(),
            renderer.attached_quads()
        );
    }

    engine.shutdown();
    info!(
        "Shut down with {} chunks attached",
        renderer.borrow().attached_count()
    );
    Ok(())
}

/// Places or removes random blocks inside the loaded chunks.
fn apply_random_edits(engine: &mut EngineState) -> VoxelResult<()> {
    let loaded = engine.world().loaded_coordinates();
    if loaded.is_empty() {
        return Ok(());
    }

    let width = engine.config().chunk.width as i32;
    let height = engine.config().chunk.height as i32;
    let block_types = [BlockType::STONE, BlockType::GRASS, BlockType::DIRT];

    let mut rebuilt = 0;
    for _ in 0..EDIT_COUNT {
        let chunk = loaded[fastrand::usize(..loaded.len())];
        let position = Point3::new(
            chunk.x * width + fastrand::i32(0..width),
            fastrand::i32(0..height),
            chunk.y * width + fastrand::i32(0..width),
        );
        let edit = if fastrand::bool() {
            BlockEdit::Remove
        } else {
            BlockEdit::Place(block_types[fastrand::usize(..block_types.len())])
        };

        match engine.apply_edit(position, edit) {
            Ok(chunks) => rebuilt += chunks.len(),
            Err(err @ VoxelError::ChunkNotLoaded(..)) => warn!("Skipped edit: {err}"),
            Err(err) => return Err(err),
        }
    }

    info!("Applied {} edits, {} mesh rebuilds", EDIT_COUNT, rebuilt);
    Ok(())
}
