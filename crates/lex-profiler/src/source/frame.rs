//! Polars-backed dataset.

use super::Dataset;
use crate::error::{ProfilingError, Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A polars `DataFrame` whose columns are all `String`.
///
/// Every value is kept as the raw text of the input so that classification
/// and parsing happen in the profiler, the same way for every backend.
pub struct FrameDataset {
    frame: DataFrame,
    columns: Vec<String>,
}

impl FrameDataset {
    /// Wrap a `DataFrame`, casting non-string columns to `String`.
    pub fn from_frame(mut frame: DataFrame) -> Result<Self> {
        let columns: Vec<String> = frame
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        for name in &columns {
            let column = frame.column(name)?;
            if column.dtype() != &DataType::String {
                let converted = column
                    .cast(&DataType::String)
                    .context(format!("Casting column '{}' to text", name))?;
                frame.replace(name, converted.take_materialized_series())?;
            }
        }

        Ok(Self { frame, columns })
    }

    /// Read a CSV file with every field kept as raw text.
    pub fn from_csv(path: &Path) -> Result<Self> {
        Self::from_frame(read_csv_frame(path)?)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    fn strings(&self, column: &str) -> Option<&StringChunked> {
        self.frame
            .column(column)
            .ok()?
            .as_materialized_series()
            .str()
            .ok()
    }
}

impl Dataset for FrameDataset {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.frame.height()
    }

    fn value(&self, row: usize, column: &str) -> Option<&str> {
        if row >= self.frame.height() {
            return None;
        }
        self.strings(column)?.get(row)
    }

    fn column_values(&self, column: &str) -> Option<Vec<Option<&str>>> {
        Some(self.strings(column)?.into_iter().collect())
    }
}

/// Read a CSV file into a `DataFrame` of `String` columns.
///
/// Empty fields become nulls. A zero-byte file yields an empty frame rather
/// than an error. Files with ragged lines are retried with truncation.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ProfilingError::SourceNotFound(path.to_path_buf()));
    }

    let metadata = std::fs::metadata(path).context(format!("Reading {}", path.display()))?;
    if metadata.len() == 0 {
        warn!("{} is empty", path.display());
        return Ok(DataFrame::empty());
    }

    // Strategy 1: standard quoting, strict line lengths
    match csv_options(false)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading of {} failed: {}", path.display(), e);
        }
    }

    // Strategy 2: tolerate ragged lines
    csv_options(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .context(format!("Reading {}", path.display()))
}

fn csv_options(truncate_ragged_lines: bool) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        // no schema inference: every column is read as String
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_missing_is_null(true)
                .with_truncate_ragged_lines(truncate_ragged_lines),
        )
}
