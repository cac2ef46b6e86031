//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which provides a framework for executing work asynchronously across multiple threads.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the main thread with the context `C`
//! 5. The result can change the context and spawn follow-up tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the main thread
//! - The context never leaves the main thread, so it needs no synchronisation

/// A unit of work executed on a worker thread.
///
/// Tasks own everything they need. `C` is the main thread context their results
/// are applied to; tasks never see it.
pub trait Task<C>: Send {
    /// Processes the task and returns a result.
    ///
    /// This runs on a background thread and should avoid blocking operations that
    /// could starve other tasks.
    fn process(&self) -> Box<dyn TaskResult<C> + Send>;
}

/// The result of processing a `Task`, applied on the main thread.
pub trait TaskResult<C>: Send {
    /// Applies the result to `context` and returns any tasks to schedule next.
    ///
    /// Runs on the main thread between frames, so keep it short.
    fn handle_result(self: Box<Self>, context: &mut C) -> Vec<Box<dyn Task<C> + Send>>;
}
