use crate::error::ProfilingError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Semantic kind assigned to a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

/// Partition of a schema into numeric and categorical columns.
///
/// Both lists keep schema order. Every schema column appears in exactly one
/// of them, except for an empty dataset where both are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    /// Every classified column with its kind, in schema order.
    pub columns: Vec<(String, ColumnKind)>,
}

impl ColumnClassification {
    /// Record a column's kind.
    pub fn push(&mut self, column: impl Into<String>, kind: ColumnKind) {
        let column = column.into();
        match kind {
            ColumnKind::Numeric => self.numeric.push(column.clone()),
            ColumnKind::Categorical => self.categorical.push(column.clone()),
        }
        self.columns.push((column, kind));
    }

    /// Kind of a column, if it was classified.
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| *kind)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

/// Numeric summary over eligible values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (denominator `count - 1`), `0.0` for a single value.
    pub std: f64,
}

/// Categorical summary over eligible values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub count: usize,
    pub unique: usize,
    pub mode: String,
    pub mode_count: usize,
}

/// Statistics for one column.
///
/// `Empty` means the column had no eligible values at all, which is not the
/// same as a summary whose fields happen to be zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryStats {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
    Empty,
}

impl SummaryStats {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Stat keys and rendered values, in fixed report order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        use crate::utils::format_float;

        match self {
            Self::Numeric(stats) => vec![
                ("count", stats.count.to_string()),
                ("mean", format_float(stats.mean)),
                ("min", format_float(stats.min)),
                ("max", format_float(stats.max)),
                ("std", format_float(stats.std)),
            ],
            Self::Categorical(stats) => vec![
                ("count", stats.count.to_string()),
                ("unique", stats.unique.to_string()),
                ("mode", stats.mode.clone()),
                ("mode_count", stats.mode_count.to_string()),
            ],
            Self::Empty => Vec::new(),
        }
    }
}

/// An ordered, non-empty list of column names used as a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    /// Build a key from column names. Returns `None` for an empty list.
    pub fn new<I, S>(columns: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            None
        } else {
            Some(Self(columns))
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Statistics of one column, as it appears in a report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    pub stats: SummaryStats,
}

/// Statistics of the representative group of one key-set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    pub key: GroupKey,
    /// Values of the key columns shared by every row of the group.
    pub key_tuple: Vec<String>,
    pub row_count: usize,
    pub columns: Vec<ColumnStats>,
}

impl GroupReport {
    /// Section label: `[page_id, ad_id] = [12, 7]`.
    pub fn label(&self) -> String {
        format!("{} = [{}]", self.key, self.key_tuple.join(", "))
    }
}

/// Complete profile of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    /// Source the dataset was loaded from.
    pub source: String,
    pub row_count: usize,
    pub classification: ColumnClassification,
    pub overall: Vec<ColumnStats>,
    /// One entry per key-set that produced a sample, in selector order.
    pub groups: Vec<GroupReport>,
}

/// What a dry run would do for one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetPlan {
    pub source: String,
    pub row_count: usize,
    pub classification: ColumnClassification,
    /// Key-sets selected by the grouping rules, before sampling.
    pub group_keys: Vec<GroupKey>,
    pub report_path: PathBuf,
}

/// Final state of one dataset in a batch.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Written { report_path: PathBuf },
    Failed { error: ProfilingError },
}

#[derive(Debug, Serialize)]
pub struct DatasetOutcome {
    pub source: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl DatasetOutcome {
    pub fn written(source: impl Into<String>, report_path: PathBuf) -> Self {
        Self {
            source: source.into(),
            status: OutcomeStatus::Written { report_path },
        }
    }

    pub fn failed(source: impl Into<String>, error: ProfilingError) -> Self {
        Self {
            source: source.into(),
            status: OutcomeStatus::Failed { error },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

/// Result of a batch run. Outcomes are in source order.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub outcomes: Vec<DatasetOutcome>,
}

impl BatchSummary {
    pub fn written_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
