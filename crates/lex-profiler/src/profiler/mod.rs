//! Dataset profiling.
//!
//! This module turns one loaded [`Dataset`] into a [`DatasetReport`]:
//! - Type inference for columns
//! - Overall numeric and categorical statistics
//! - Statistics of one representative group per selected key-set
//!
//! Every step works through the [`Dataset`] trait, so the same report comes
//! out of every backend.

mod statistics;
mod type_inference;

pub use statistics::{summarize_categorical, summarize_numeric};
use type_inference::{classify_columns, infer_column_kind};

use crate::config::ProfilerConfig;
use crate::error::{ProfilingError, Result};
use crate::grouping::{GroupSample, matching_rule, sample_first_group, select_group_keys};
use crate::pipeline::ProfilingStage;
use crate::source::Dataset;
use crate::types::{
    ColumnClassification, ColumnKind, ColumnStats, DatasetReport, GroupKey, GroupReport,
    SummaryStats,
};
use tracing::{debug, warn};

/// Profiles single datasets with a fixed configuration.
pub struct DataProfiler<'c> {
    config: &'c ProfilerConfig,
    null_tokens: Vec<String>,
}

impl<'c> DataProfiler<'c> {
    pub fn new(config: &'c ProfilerConfig) -> Self {
        Self {
            config,
            null_tokens: config.normalized_null_tokens(),
        }
    }

    /// Classify the dataset's columns.
    pub fn classify(&self, dataset: &dyn Dataset) -> ColumnClassification {
        classify_columns(
            dataset,
            self.config.sample_size,
            self.config.min_numeric_ratio,
        )
    }

    /// Key-sets selected for the dataset's schema.
    pub fn group_keys(&self, dataset: &dyn Dataset) -> Vec<GroupKey> {
        let columns = dataset.column_names();
        let keys = select_group_keys(columns, &self.config.grouping_rules);
        if let Some(rule) = matching_rule(columns, &self.config.grouping_rules) {
            debug!("Grouping rule '{}' selected {} key-sets", rule.name, keys.len());
        }
        keys
    }

    /// Profile a dataset end to end.
    ///
    /// `source` only labels the report.
    pub fn profile(&self, dataset: &dyn Dataset, source: &str) -> DatasetReport {
        self.profile_with_stages(dataset, source, |_| {})
    }

    /// Like [`profile`](Self::profile), calling `on_stage` as each stage
    /// starts.
    pub fn profile_with_stages(
        &self,
        dataset: &dyn Dataset,
        source: &str,
        mut on_stage: impl FnMut(ProfilingStage),
    ) -> DatasetReport {
        if dataset.is_empty() {
            warn!("{} has no rows; report will contain no statistics", source);
        }

        on_stage(ProfilingStage::Classifying);
        let classification = self.classify(dataset);
        debug!(
            "{}: numeric columns {:?}, categorical columns {:?}",
            source, classification.numeric, classification.categorical
        );

        on_stage(ProfilingStage::Summarizing);
        let overall = self.summarize(dataset, &classification);

        on_stage(ProfilingStage::Grouping);
        let groups = self.summarize_groups(dataset, &classification, source);

        DatasetReport {
            source: source.to_string(),
            row_count: dataset.row_count(),
            classification,
            overall,
            groups,
        }
    }

    /// Statistics of the first-seen group of every selected key-set.
    ///
    /// Key-sets without a single complete row are left out.
    pub fn summarize_groups(
        &self,
        dataset: &dyn Dataset,
        classification: &ColumnClassification,
        source: &str,
    ) -> Vec<GroupReport> {
        let mut groups = Vec::new();
        for key in self.group_keys(dataset) {
            match sample_first_group(dataset, &key) {
                Some(sample) => {
                    debug!(
                        "{}: sampled {} = [{}] ({} rows)",
                        source,
                        key,
                        sample.key_tuple.join(", "),
                        sample.row_count()
                    );
                    groups.push(self.summarize_group(&sample, classification));
                }
                None => debug!("{}: no row has a complete {} key", source, key),
            }
        }
        groups
    }

    /// Statistics for every classified column, in schema order.
    pub fn summarize(
        &self,
        dataset: &dyn Dataset,
        classification: &ColumnClassification,
    ) -> Vec<ColumnStats> {
        classification
            .columns
            .iter()
            .map(|(column, kind)| ColumnStats {
                column: column.clone(),
                stats: self.summarize_column(dataset, column, *kind),
            })
            .collect()
    }

    /// Classify and summarize a single column.
    pub fn column_stats(&self, dataset: &dyn Dataset, column: &str) -> Result<ColumnStats> {
        if !dataset.has_column(column) {
            return Err(ProfilingError::ColumnNotFound(column.to_string()));
        }

        let sampled = self.config.sample_size.min(dataset.row_count());
        let kind = infer_column_kind(dataset, column, sampled, self.config.min_numeric_ratio);
        Ok(ColumnStats {
            column: column.to_string(),
            stats: self.summarize_column(dataset, column, kind),
        })
    }

    /// Statistics for one column according to its kind.
    pub fn summarize_column(
        &self,
        dataset: &dyn Dataset,
        column: &str,
        kind: ColumnKind,
    ) -> SummaryStats {
        let Some(values) = dataset.column_values(column) else {
            return SummaryStats::Empty;
        };

        match kind {
            ColumnKind::Numeric => summarize_numeric(&values),
            ColumnKind::Categorical => summarize_categorical(&values, &self.null_tokens),
        }
    }

    fn summarize_group(
        &self,
        sample: &GroupSample<'_>,
        classification: &ColumnClassification,
    ) -> GroupReport {
        GroupReport {
            key: sample.key.clone(),
            key_tuple: sample.key_tuple.clone(),
            row_count: sample.row_count(),
            columns: self.summarize(&sample.rows, classification),
        }
    }
}
