//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use voxel_core::{
    ChunkConfig, ChunkCoordinate, ChunkRenderer, EngineConfig, EngineState, GeneratedMesh,
};

/// One call the streamer made on its renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Attach(ChunkCoordinate),
    Detach(ChunkCoordinate),
}

/// Everything a [`Recorder`] has seen.
#[derive(Debug, Default)]
pub struct Recording {
    pub events: Vec<RenderEvent>,
    pub attached: HashMap<ChunkCoordinate, GeneratedMesh>,
}

impl Recording {
    pub fn attaches(&self) -> Vec<ChunkCoordinate> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Attach(position) => Some(*position),
                RenderEvent::Detach(_) => None,
            })
            .collect()
    }

    pub fn detaches(&self) -> Vec<ChunkCoordinate> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Detach(position) => Some(*position),
                RenderEvent::Attach(_) => None,
            })
            .collect()
    }
}

/// A renderer that keeps a copy of everything it is handed.
#[derive(Clone, Default)]
pub struct Recorder(pub Rc<RefCell<Recording>>);

impl ChunkRenderer for Recorder {
    fn attach_mesh(&mut self, position: ChunkCoordinate, mesh: &GeneratedMesh) {
        let mut recording = self.0.borrow_mut();
        recording.events.push(RenderEvent::Attach(position));
        recording.attached.insert(position, mesh.clone());
    }

    fn detach_mesh(&mut self, position: ChunkCoordinate) {
        let mut recording = self.0.borrow_mut();
        recording.events.push(RenderEvent::Detach(position));
        recording.attached.remove(&position);
    }
}

/// Small chunks so streaming tests stay fast.
pub fn small_config(view_radius: i32, load_delay_ms: u64) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.chunk = ChunkConfig {
        width: 4,
        height: 16,
        block_scale: 1.0,
    };
    config.streaming.view_radius = view_radius;
    config.streaming.load_delay_ms = load_delay_ms;
    config
}

/// An engine wired to a fresh recorder.
pub fn engine(config: EngineConfig) -> (EngineState, Recorder) {
    let recorder = Recorder::default();
    let engine = EngineState::new(config, Box::new(recorder.clone())).unwrap();
    (engine, recorder)
}
