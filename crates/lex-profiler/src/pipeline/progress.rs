//! Progress reporting for profiling batches.
//!
//! Each dataset in a batch emits a sequence of [`ProgressUpdate`]s, tagged
//! with its source path. With parallel batches, updates of different
//! datasets interleave; updates of one dataset arrive in stage order.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_profiler::{Profiler, ProfilerConfig};
//!
//! let summary = Profiler::builder()
//!     .config(ProfilerConfig::builder().source("data/ads.csv").build()?)
//!     .on_progress(|update| {
//!         println!("[{}] {}: {}", update.stage.display_name(), update.source, update.message);
//!     })
//!     .build()?
//!     .run();
//! ```

use serde::{Deserialize, Serialize};

/// Stages a dataset passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfilingStage {
    /// Reading the source into a dataset backend
    Loading,
    /// Inferring column kinds
    Classifying,
    /// Computing overall statistics
    Summarizing,
    /// Selecting key-sets and summarizing sampled groups
    Grouping,
    /// Rendering and writing the report
    Writing,
    /// Report written
    Complete,
    /// Dataset failed; the batch continues
    Failed,
}

impl ProfilingStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Classifying => "Classifying Columns",
            Self::Summarizing => "Summarizing",
            Self::Grouping => "Sampling Groups",
            Self::Writing => "Writing Report",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Whether no further updates follow for the dataset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

/// A progress update for one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Source path of the dataset, as configured
    pub source: String,

    /// Current stage
    pub stage: ProfilingStage,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(source: impl Into<String>, stage: ProfilingStage, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            stage,
            message: message.into(),
        }
    }

    /// Creates a completion update.
    pub fn complete(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(source, ProfilingStage::Complete, message)
    }

    /// Creates a failure update.
    pub fn failed(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(source, ProfilingStage::Failed, message)
    }
}

/// Trait for receiving progress updates during a batch.
///
/// Implementations must be `Send + Sync`: parallel batches report from
/// rayon worker threads.
pub trait ProgressReporter: Send + Sync {
    /// Called on every stage change of every dataset.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new("ads.csv", ProfilingStage::Loading, "Loading...");
        assert_eq!(update.source, "ads.csv");
        assert_eq!(update.stage, ProfilingStage::Loading);
        assert_eq!(update.message, "Loading...");
    }

    #[test]
    fn test_terminal_stages() {
        assert!(ProgressUpdate::complete("a.csv", "done").stage.is_terminal());
        assert!(ProgressUpdate::failed("a.csv", "boom").stage.is_terminal());
        assert!(!ProfilingStage::Writing.is_terminal());
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new("a.csv", ProfilingStage::Summarizing, "Test"));
        reporter.report(ProgressUpdate::complete("a.csv", "Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_profiling_stage_json_values() {
        let stage_expectations = [
            (ProfilingStage::Loading, "\"loading\""),
            (ProfilingStage::Classifying, "\"classifying\""),
            (ProfilingStage::Summarizing, "\"summarizing\""),
            (ProfilingStage::Grouping, "\"grouping\""),
            (ProfilingStage::Writing, "\"writing\""),
            (ProfilingStage::Complete, "\"complete\""),
            (ProfilingStage::Failed, "\"failed\""),
        ];

        for (stage, expected_json) in stage_expectations {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, expected_json, "ProfilingStage::{:?} should serialize to {}", stage, expected_json);
        }
    }

    #[test]
    fn test_progress_reporter_across_threads() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = Arc::new(ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let reporter_clone = reporter.clone();
        let handle = std::thread::spawn(move || {
            reporter_clone.report(ProgressUpdate::new(
                "b.csv",
                ProfilingStage::Grouping,
                "Test from background thread",
            ));
        });

        handle.join().unwrap();
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
