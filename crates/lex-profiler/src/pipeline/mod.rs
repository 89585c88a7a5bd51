//! Batch orchestration.
//!
//! This module runs the profiling pipeline over every configured source and
//! reports progress along the way.

mod builder;
pub mod progress;

pub use builder::{Profiler, ProfilerBuilder};
pub use progress::{ClosureProgressReporter, ProfilingStage, ProgressReporter, ProgressUpdate};
