//! # Voxel Task System
//!
//! This module contains the tasks that change which chunks exist. They are
//! queued by the streamer and run one at a time by the `TaskManager`, so
//! generation is spread over many update ticks.

pub mod chunk_generation_task;
