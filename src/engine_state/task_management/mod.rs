//! # Task Management System
//!
//! This module provides the cooperative scheduler that spreads chunk loading
//! over many update ticks so a burst of generation never stalls the loop.
//!
//! ## Architecture Overview
//! - `TaskManager`: FIFO queue of pending tasks plus the throttle clock
//! - `Task`: one atomic step of work, see [`task`]
//! - `TaskContext`: the engine state lent to a task while it runs
//!
//! ## Scheduling
//! Time passed to [`TaskManager::process_queued_tasks`] accumulates until the
//! configured delay is reached. Then tasks are popped in FIFO order until one
//! of them completes real work; tasks that turn out to be no-ops are discarded
//! without using up the tick. Completing or failing a task restarts the delay.
//!
//! Clearing the queue cancels every pending task.
//!
//! ## Example Usage
//! ```ignore
//! let mut task_manager = TaskManager::new(config.streaming.load_delay());
//! task_manager.publish_task(Box::new(ChunkGenerationTask::new(position)));
//!
//! // In the update loop:
//! task_manager.process_queued_tasks(dt, &mut context)?;
//! ```

pub mod task;

use std::collections::VecDeque;

use log::{debug, trace};
use web_time::Duration;

use crate::error::VoxelResult;

use task::{Task, TaskContext, TaskOutcome};

/// Queues tasks and releases them at a bounded rate.
pub struct TaskManager {
    queued_tasks: VecDeque<Box<dyn Task>>,
    delay: Duration,
    elapsed: Duration,
}

impl TaskManager {
    /// Creates a manager that runs at most one effective task per `delay`.
    pub fn new(delay: Duration) -> Self {
        TaskManager {
            queued_tasks: VecDeque::new(),
            delay,
            elapsed: Duration::ZERO,
        }
    }

    /// Appends a task to the back of the queue.
    pub fn publish_task(&mut self, task: Box<dyn Task>) {
        self.queued_tasks.push_back(task);
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Whether no task is waiting.
    pub fn is_empty(&self) -> bool {
        self.queued_tasks.is_empty()
    }

    /// Drops every pending task and resets the throttle clock.
    ///
    /// # Returns
    /// The number of tasks cancelled.
    pub fn clear(&mut self) -> usize {
        let cancelled = self.queued_tasks.len();
        self.queued_tasks.clear();
        self.elapsed = Duration::ZERO;
        if cancelled > 0 {
            debug!("Cancelled {} queued tasks", cancelled);
        }
        cancelled
    }

    /// Advances the throttle clock by `dt` and runs at most one task that
    /// does real work, if the delay has elapsed.
    ///
    /// # Returns
    /// `true` if a task completed during this call.
    ///
    /// # Errors
    /// Propagates the first task error. The failing task is dropped, the rest
    /// of the queue is kept and the delay restarts.
    pub fn process_queued_tasks(
        &mut self,
        dt: Duration,
        context: &mut TaskContext<'_>,
    ) -> VoxelResult<bool> {
        if self.queued_tasks.is_empty() {
            // An idle queue does not bank time for a later burst.
            self.elapsed = Duration::ZERO;
            return Ok(false);
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.delay {
            return Ok(false);
        }

        while let Some(task) = self.queued_tasks.pop_front() {
            match task.process(context) {
                Ok(TaskOutcome::Completed) => {
                    self.elapsed = Duration::ZERO;
                    return Ok(true);
                }
                Ok(TaskOutcome::Skipped) => trace!("Skipped a redundant task"),
                Err(err) => {
                    self.elapsed = Duration::ZERO;
                    return Err(err);
                }
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        engine_state::{
            config::{ChunkConfig, MeshConfig, TerrainConfig},
            rendering::{meshing::MeshBuilder, NullRenderer},
            voxels::{terrain::TerrainGenerator, world::World},
        },
        error::VoxelError,
    };

    /// Records its id when run; `skip` tasks report no work.
    struct Marker {
        id: u32,
        skip: bool,
        fail: bool,
        log: Rc<RefCell<Vec<u32>>>,
    }

    impl Task for Marker {
        fn process(&self, _context: &mut TaskContext<'_>) -> VoxelResult<TaskOutcome> {
            self.log.borrow_mut().push(self.id);
            if self.fail {
                return Err(VoxelError::ChunkNotLoaded(0, 0));
            }
            Ok(if self.skip {
                TaskOutcome::Skipped
            } else {
                TaskOutcome::Completed
            })
        }
    }

    struct Fixture {
        world: World,
        terrain: TerrainGenerator,
        mesh_builder: MeshBuilder,
        renderer: NullRenderer,
        chunk_config: ChunkConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let chunk_config = ChunkConfig::default();
            Fixture {
                world: World::new(),
                terrain: TerrainGenerator::new(TerrainConfig::default(), chunk_config),
                mesh_builder: MeshBuilder::new(&chunk_config, MeshConfig::default()),
                renderer: NullRenderer,
                chunk_config,
            }
        }

        fn context(&mut self) -> TaskContext<'_> {
            TaskContext {
                world: &mut self.world,
                terrain: &self.terrain,
                mesh_builder: &self.mesh_builder,
                renderer: &mut self.renderer,
                chunk_config: &self.chunk_config,
            }
        }
    }

    fn publish(manager: &mut TaskManager, log: &Rc<RefCell<Vec<u32>>>, id: u32, skip: bool) {
        manager.publish_task(Box::new(Marker {
            id,
            skip,
            fail: false,
            log: log.clone(),
        }));
    }

    #[test]
    fn waits_for_the_delay() {
        let mut fixture = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = TaskManager::new(Duration::from_millis(50));
        publish(&mut manager, &log, 1, false);
        publish(&mut manager, &log, 2, false);

        let dt = Duration::from_millis(20);
        assert!(!manager.process_queued_tasks(dt, &mut fixture.context()).unwrap());
        assert!(!manager.process_queued_tasks(dt, &mut fixture.context()).unwrap());
        assert!(manager.process_queued_tasks(dt, &mut fixture.context()).unwrap());
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(manager.len(), 1);

        // The clock restarts after a completed task.
        assert!(!manager.process_queued_tasks(dt, &mut fixture.context()).unwrap());
        assert!(!manager.process_queued_tasks(dt, &mut fixture.context()).unwrap());
        assert!(manager.process_queued_tasks(dt, &mut fixture.context()).unwrap());
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert!(manager.is_empty());
    }

    #[test]
    fn one_effective_task_per_tick() {
        let mut fixture = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = TaskManager::new(Duration::ZERO);
        for id in 0..3 {
            publish(&mut manager, &log, id, false);
        }

        manager
            .process_queued_tasks(Duration::from_secs(10), &mut fixture.context())
            .unwrap();
        assert_eq!(*log.borrow(), vec![0]);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn skipped_tasks_do_not_use_the_slot() {
        let mut fixture = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = TaskManager::new(Duration::ZERO);
        publish(&mut manager, &log, 1, true);
        publish(&mut manager, &log, 2, true);
        publish(&mut manager, &log, 3, false);
        publish(&mut manager, &log, 4, false);

        assert!(manager
            .process_queued_tasks(Duration::ZERO, &mut fixture.context())
            .unwrap());
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn clear_cancels_pending_tasks() {
        let mut fixture = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = TaskManager::new(Duration::ZERO);
        publish(&mut manager, &log, 1, false);
        publish(&mut manager, &log, 2, false);

        assert_eq!(manager.clear(), 2);
        assert!(!manager
            .process_queued_tasks(Duration::from_secs(1), &mut fixture.context())
            .unwrap());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn errors_drop_only_the_failing_task() {
        let mut fixture = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = TaskManager::new(Duration::ZERO);
        manager.publish_task(Box::new(Marker {
            id: 1,
            skip: false,
            fail: true,
            log: log.clone(),
        }));
        publish(&mut manager, &log, 2, false);

        assert!(manager
            .process_queued_tasks(Duration::ZERO, &mut fixture.context())
            .is_err());
        assert_eq!(manager.len(), 1);
        assert!(manager
            .process_queued_tasks(Duration::ZERO, &mut fixture.context())
            .unwrap());
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn a_failing_task_restarts_the_delay() {
        let mut fixture = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = TaskManager::new(Duration::from_millis(50));
        manager.publish_task(Box::new(Marker {
            id: 1,
            skip: false,
            fail: true,
            log: log.clone(),
        }));
        publish(&mut manager, &log, 2, false);

        let dt = Duration::from_millis(50);
        assert!(manager.process_queued_tasks(dt, &mut fixture.context()).is_err());

        // The next load waits a full delay again.
        let half = Duration::from_millis(25);
        assert!(!manager.process_queued_tasks(half, &mut fixture.context()).unwrap());
        assert_eq!(*log.borrow(), vec![1]);
        assert!(manager.process_queued_tasks(half, &mut fixture.context()).unwrap());
        assert_eq!(*log.borrow(), vec![1, 2]);
    }
}
