//! Batch profiling.
//!
//! This module provides the `Profiler` struct and builder that run the
//! per-dataset pipeline (load, classify, summarize, group, write) over every
//! configured source.

use crate::config::{ConfigValidationError, ProfilerConfig};
use crate::error::{ProfilingError, Result};
use crate::pipeline::progress::{
    ClosureProgressReporter, ProfilingStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::reporting::ReportWriter;
use crate::source::load_dataset;
use crate::types::{BatchSummary, DatasetOutcome, DatasetPlan, DatasetReport};
use chrono::Local;
use rayon::prelude::*;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The batch profiler.
///
/// Use [`Profiler::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use lex_profiler::{Profiler, ProfilerConfig};
///
/// let config = ProfilerConfig::builder()
///     .sources(["data/ads.csv", "data/posts.csv"])
///     .output_dir("reports")
///     .build()?;
///
/// let summary = Profiler::builder()
///     .config(config)
///     .on_progress(|update| println!("{}: {}", update.source, update.message))
///     .build()?
///     .run();
///
/// println!("{} written, {} failed", summary.written_count(), summary.failed_count());
/// ```
pub struct Profiler {
    config: ProfilerConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    writer: ReportWriter,
}

// Datasets are profiled from rayon worker threads sharing one Profiler.
static_assertions::assert_impl_all!(Profiler: Send, Sync);

/// A source with the report path it writes to, or the source that already
/// claimed that path.
struct Claim<'a> {
    source: &'a Path,
    report_path: PathBuf,
    claimed_by: Option<&'a Path>,
}

impl Profiler {
    /// Create a new profiler builder.
    pub fn builder() -> ProfilerBuilder {
        ProfilerBuilder::default()
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile every configured source and write its report.
    ///
    /// A failing dataset never stops the batch; it is recorded as failed in
    /// the returned summary. Outcomes are in source order even when datasets
    /// run in parallel.
    pub fn run(&self) -> BatchSummary {
        let started_at = Local::now();
        let start_time = Instant::now();
        info!(
            "Profiling {} datasets ({})",
            self.config.sources.len(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        let claims = self.claim_report_paths();
        let outcomes: Vec<DatasetOutcome> = if self.config.parallel {
            claims.par_iter().map(|claim| self.run_claim(claim)).collect()
        } else {
            claims.iter().map(|claim| self.run_claim(claim)).collect()
        };

        let summary = BatchSummary {
            started_at,
            finished_at: Local::now(),
            outcomes,
        };
        info!(
            "Batch finished in {:?}: {} written, {} failed",
            start_time.elapsed(),
            summary.written_count(),
            summary.failed_count()
        );
        summary
    }

    /// Load and profile one source without writing anything.
    pub fn profile_source(&self, source: &Path) -> Result<DatasetReport> {
        let label = source.display().to_string();

        self.report_progress(ProgressUpdate::new(
            &label,
            ProfilingStage::Loading,
            "Loading dataset...",
        ));
        let dataset = load_dataset(source, self.config.backend)
            .map_err(|e| e.with_context(format!("Failed to load {}", label)))?;
        debug!(
            "{}: {} rows, {} columns",
            label,
            dataset.row_count(),
            dataset.column_names().len()
        );

        let profiler = DataProfiler::new(&self.config);
        let report = profiler.profile_with_stages(dataset.as_ref(), &label, |stage| {
            self.report_progress(ProgressUpdate::new(&label, stage, stage_message(stage)));
        });
        Ok(report)
    }

    /// Describe what a run would do for one source, without writing anything.
    pub fn plan(&self, source: &Path) -> Result<DatasetPlan> {
        let label = source.display().to_string();
        let dataset = load_dataset(source, self.config.backend)
            .map_err(|e| e.with_context(format!("Failed to load {}", label)))?;

        let profiler = DataProfiler::new(&self.config);
        Ok(DatasetPlan {
            source: label,
            row_count: dataset.row_count(),
            classification: profiler.classify(dataset.as_ref()),
            group_keys: profiler.group_keys(dataset.as_ref()),
            report_path: self.config.report_path_for(source),
        })
    }

    /// Plans for every configured source, in source order.
    pub fn plan_all(&self) -> Vec<(PathBuf, Result<DatasetPlan>)> {
        self.config
            .sources
            .iter()
            .map(|source| (source.clone(), self.plan(source)))
            .collect()
    }

    /// Assign report paths in source order; the first source mapping to a
    /// path owns it.
    fn claim_report_paths(&self) -> Vec<Claim<'_>> {
        let mut owners: HashMap<PathBuf, &Path> = HashMap::new();

        self.config
            .sources
            .iter()
            .map(|source| {
                let report_path = self.config.report_path_for(source);
                let claimed_by = match owners.get(&report_path) {
                    Some(owner) => Some(*owner),
                    None => {
                        owners.insert(report_path.clone(), source.as_path());
                        None
                    }
                };
                Claim {
                    source: source.as_path(),
                    report_path,
                    claimed_by,
                }
            })
            .collect()
    }

    fn run_claim(&self, claim: &Claim<'_>) -> DatasetOutcome {
        let label = claim.source.display().to_string();

        let result = match claim.claimed_by {
            Some(owner) => {
                warn!(
                    "{} maps to {}, already claimed by {}",
                    label,
                    claim.report_path.display(),
                    owner.display()
                );
                Err(ProfilingError::OutputCollision {
                    path: claim.report_path.clone(),
                    claimed_by: owner.to_path_buf(),
                })
            }
            None => panic::catch_unwind(AssertUnwindSafe(|| {
                self.process_source(claim.source, &claim.report_path)
            }))
            .unwrap_or_else(|payload| Err(ProfilingError::Internal(panic_message(&*payload)))),
        };

        match result {
            Ok(()) => {
                self.report_progress(ProgressUpdate::complete(
                    &label,
                    format!("Report written to {}", claim.report_path.display()),
                ));
                DatasetOutcome::written(label, claim.report_path.clone())
            }
            Err(e) => {
                if e.is_input_error() {
                    error!("Dataset {} could not be read: {}", label, e);
                } else {
                    error!("Dataset {} failed: {}", label, e);
                }
                self.report_progress(ProgressUpdate::failed(&label, e.to_string()));
                DatasetOutcome::failed(label, e)
            }
        }
    }

    fn process_source(&self, source: &Path, report_path: &Path) -> Result<()> {
        info!("Profiling {}", source.display());
        let report = self.profile_source(source)?;

        self.report_progress(ProgressUpdate::new(
            source.display().to_string(),
            ProfilingStage::Writing,
            stage_message(ProfilingStage::Writing),
        ));
        self.writer.write(&report, report_path)
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("profiling panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("profiling panicked: {}", message)
    } else {
        "profiling panicked".to_string()
    }
}

fn stage_message(stage: ProfilingStage) -> &'static str {
    match stage {
        ProfilingStage::Loading => "Loading dataset...",
        ProfilingStage::Classifying => "Inferring column kinds...",
        ProfilingStage::Summarizing => "Computing overall statistics...",
        ProfilingStage::Grouping => "Sampling groups...",
        ProfilingStage::Writing => "Writing report...",
        ProfilingStage::Complete => "Complete",
        ProfilingStage::Failed => "Failed",
    }
}

/// Builder for creating a [`Profiler`] instance.
///
/// Use [`Profiler::builder()`] to get started.
#[derive(Default)]
pub struct ProfilerBuilder {
    config: Option<ProfilerConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(ProfilerBuilder: Send);

impl ProfilerBuilder {
    /// Set the profiler configuration.
    pub fn config(mut self, config: ProfilerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during a batch.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the profiler.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Profiler, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let writer = ReportWriter::new(config.output_dir.clone());

        Ok(Profiler {
            config,
            progress_reporter: self.progress_reporter,
            writer,
        })
    }
}
