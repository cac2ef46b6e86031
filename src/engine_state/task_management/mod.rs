//! # Task Management System
//!
//! This module provides a cross-platform task management system for executing work
//! asynchronously across multiple threads (native) or using web workers (WASM).
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, applied to a main thread context
//! - `TaskChannel`: Communication channel between the main thread and one worker
//!
//! ## Platform-Specific Behavior
//!
//! ### Native (Desktop) Implementation
//! - Uses `std::thread` for true multi-threading
//! - Each worker has a dedicated channel for task distribution
//!
//! ### Web (WASM) Implementation
//! - Uses the `wasm_thread` crate, which backs each worker with a Web Worker
//! - Tasks are processed asynchronously but may not run in parallel
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send the results back
//! 4. Results are applied on the main thread in `process_completed_tasks()`
//! 5. Results can spawn new tasks, which are published in turn
//!
//! ## Example Usage
//! ```ignore
//! let mut task_manager = TaskManager::new(2);
//! task_manager.publish_task(Box::new(CellGenerationTask::new(config)));
//!
//! // In the event loop:
//! task_manager.process_completed_tasks(&mut renderer);
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use log::{debug, info, warn};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use task::{Task, TaskResult};

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use wasm_thread as thread;
        use wasm_thread::JoinHandle;
    } else {
        use std::thread::{self, JoinHandle};
    }
}

/// A communication channel between the main thread and a worker thread.
///
/// Dropping the channel drops `task_sender`, which ends the worker loop.
pub struct TaskChannel<C> {
    task_sender: Sender<Box<dyn Task<C> + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult<C> + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// Tasks that cannot be handed to a worker immediately wait in `queued_tasks`
/// until `process_queued_tasks` finds a free channel.
pub struct TaskManager<C> {
    channels: Vec<TaskChannel<C>>,
    queued_tasks: VecDeque<Box<dyn Task<C> + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Set to 1 so a long task never holds up work queued behind it on the same worker.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl<C: 'static> TaskManager<C> {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// With zero workers every published task stays queued.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Starting {} task workers, available parallelism: {:?}",
            num_workers,
            thread::available_parallelism()
        );

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task<C> + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult<C> + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::spawn(task_closure);

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// Returns the task back on failure so it can be requeued.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task<C> + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task<C> + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                warn!("Task worker {} disconnected", channel_idx);
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    ///
    /// Channels that have reached `MAX_TASKS_IN_FLIGHT` are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// Returns `true` if the task went straight to a worker and `false` if it was
    /// queued because all workers are busy.
    pub fn publish_task(&mut self, task: Box<dyn Task<C> + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                debug!("All task workers busy, queueing task");
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to workers, oldest first, until the queue is empty or
    /// every worker is busy.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                }
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Applies every finished result to `context` and publishes the tasks they spawn.
    ///
    /// Must be called on the main thread. Returns the number of results handled.
    pub fn process_completed_tasks(&mut self, context: &mut C) -> usize {
        let mut tasks_to_queue = Vec::new();
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                handled += 1;
                tasks_to_queue.extend(result.handle_result(context));
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        handled
    }

    /// Whether no task is queued or running.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty()
            && self
                .channels
                .iter()
                .all(|channel| channel.num_tasks_in_flight == 0)
    }

    /// Number of tasks waiting for a worker.
    pub fn queued_len(&self) -> usize {
        self.queued_tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Squares a number on a worker; the result pushes it into the context.
    struct SquareTask(u64);

    struct SquareResult(u64);

    impl Task<Vec<u64>> for SquareTask {
        fn process(&self) -> Box<dyn TaskResult<Vec<u64>> + Send> {
            Box::new(SquareResult(self.0 * self.0))
        }
    }

    impl TaskResult<Vec<u64>> for SquareResult {
        fn handle_result(
            self: Box<Self>,
            context: &mut Vec<u64>,
        ) -> Vec<Box<dyn Task<Vec<u64>> + Send>> {
            context.push(self.0);
            Vec::new()
        }
    }

    /// Counts down, spawning the next step from each result.
    struct CountdownTask(u64);

    impl Task<Vec<u64>> for CountdownTask {
        fn process(&self) -> Box<dyn TaskResult<Vec<u64>> + Send> {
            Box::new(CountdownResult(self.0))
        }
    }

    struct CountdownResult(u64);

    impl TaskResult<Vec<u64>> for CountdownResult {
        fn handle_result(
            self: Box<Self>,
            context: &mut Vec<u64>,
        ) -> Vec<Box<dyn Task<Vec<u64>> + Send>> {
            context.push(self.0);
            if self.0 == 0 {
                Vec::new()
            } else {
                vec![Box::new(CountdownTask(self.0 - 1))]
            }
        }
    }

    fn drain(manager: &mut TaskManager<Vec<u64>>, context: &mut Vec<u64>) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !manager.is_idle() {
            assert!(Instant::now() < deadline, "tasks did not finish in time");
            manager.process_completed_tasks(context);
            manager.process_queued_tasks();
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_results_reach_the_context() {
        let mut manager = TaskManager::new(2);
        let mut context = Vec::new();
        for n in 1..=10 {
            manager.publish_task(Box::new(SquareTask(n)));
        }
        drain(&mut manager, &mut context);

        context.sort();
        assert_eq!(context, (1..=10).map(|n| n * n).collect::<Vec<_>>());
    }

    #[test]
    fn test_busy_workers_queue_tasks() {
        let mut manager: TaskManager<Vec<u64>> = TaskManager::new(1);
        assert!(manager.publish_task(Box::new(SquareTask(2))));
        assert!(!manager.publish_task(Box::new(SquareTask(3))));
        assert_eq!(manager.queued_len(), 1);
        assert!(!manager.is_idle());

        let mut context = Vec::new();
        drain(&mut manager, &mut context);
        assert_eq!(manager.queued_len(), 0);
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_results_can_spawn_follow_up_tasks() {
        let mut manager = TaskManager::new(3);
        let mut context = Vec::new();
        manager.publish_task(Box::new(CountdownTask(4)));
        drain(&mut manager, &mut context);
        assert_eq!(context, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_no_workers_keeps_everything_queued() {
        let mut manager: TaskManager<Vec<u64>> = TaskManager::new(0);
        assert!(!manager.publish_task(Box::new(SquareTask(5))));
        manager.process_queued_tasks();
        let mut context = Vec::new();
        assert_eq!(manager.process_completed_tasks(&mut context), 0);
        assert_eq!(manager.queued_len(), 1);
        assert!(context.is_empty());
    }
}
