//! Dataset Profiling Library
//!
//! Batch statistical profiling of tabular CSV datasets, built with Rust and Polars.
//!
//! # Overview
//!
//! For every input file the profiler:
//!
//! - **Classifies columns**: numeric or categorical, from a sample of leading rows
//! - **Summarizes columns**: count, mean, min, max and sample std for numeric columns;
//!   count, unique, mode and mode count for categorical ones
//! - **Samples groups**: picks key-sets from a rule table keyed on the schema and
//!   summarizes the first-seen group of each
//! - **Writes a report**: a deterministic text file per dataset
//!
//! Datasets are independent. A batch keeps going when one of them fails and
//! can profile datasets in parallel.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_profiler::{Profiler, ProfilerConfig};
//!
//! let config = ProfilerConfig::builder()
//!     .sources(["data/ads.csv", "data/posts.csv", "data/tweets.csv"])
//!     .output_dir("output")
//!     .build()?;
//!
//! let summary = Profiler::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{}] {}: {}", update.stage.display_name(), update.source, update.message);
//!     })
//!     .build()?
//!     .run();
//!
//! for outcome in &summary.outcomes {
//!     println!("{}: {:?}", outcome.source, outcome.status);
//! }
//! ```
//!
//! # Backends
//!
//! Every step works through the [`Dataset`] trait. Two backends ship with the crate:
//!
//! - [`FrameDataset`] - a polars `DataFrame` read from CSV (default)
//! - [`RecordDataset`] - in-memory rows of field maps
//!
//! Both produce identical reports for the same input.
//!
//! # Single Datasets
//!
//! ```rust,ignore
//! use lex_profiler::{DataProfiler, ProfilerConfig, RecordDataset, Row, render_report};
//!
//! let dataset = RecordDataset::new(
//!     ["id", "val"],
//!     vec![Row::new().with("id", "1").with("val", "10")],
//! );
//! let config = ProfilerConfig::default();
//! let report = DataProfiler::new(&config).profile(&dataset, "inline");
//! print!("{}", render_report(&report));
//! ```

pub mod config;
pub mod error;
pub mod grouping;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod source;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{Backend, ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder};
pub use error::{ProfilingError, Result as ProfilingResult, ResultExt};
pub use grouping::{GroupSample, GroupingRule, default_grouping_rules, sample_first_group, select_group_keys};
pub use pipeline::{
    ClosureProgressReporter, Profiler, ProfilerBuilder, ProfilingStage, ProgressReporter,
    ProgressUpdate,
};
pub use profiler::{DataProfiler, summarize_categorical, summarize_numeric};
pub use reporting::{ReportWriter, render_report};
pub use source::{Dataset, FrameDataset, RecordDataset, Row, Subset, load_dataset};
pub use types::{
    BatchSummary, CategoricalStats, ColumnClassification, ColumnKind, ColumnStats, DatasetOutcome,
    DatasetPlan, DatasetReport, GroupKey, GroupReport, NumericStats, OutcomeStatus, SummaryStats,
};
