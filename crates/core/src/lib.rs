//! foreman-core: Core library for the foreman coordination toolkit
//!
//! This crate provides:
//! - Shared counters safe under contention (plus the racy variant kept
//!   as a hazard demonstration)
//! - Rank-ordered multi-lock acquisition that makes circular-wait
//!   deadlocks structurally impossible
//! - A bounded producer/consumer pipeline with sentinel termination
//! - A fixed-size worker pool for CPU-bound task batches

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod coordination;
pub mod counter;
pub mod pipeline;
pub mod pool;

// Re-exports
pub use config::{
    ConfigError, CoordinationConfig, OrderingSettings, PipelineSettings, PoolSettings,
};
pub use coordination::{ActorId, Lease, LockOrderingManager, OrderingError, Rank};
pub use counter::{Counter, RacyCounter};
pub use pipeline::{BoundedPipeline, Consumed, Delivery, PipelineError, ProducerId};
pub use pool::{BatchOutcome, PoolError, Task, TaskId, TaskOutcome, TaskResult, WorkerPool};
