//! Row sources: the dataset abstraction every profiling step is written against.
//!
//! A [`Dataset`] is an immutable table with an ordered schema and ordered
//! rows whose values are raw text, possibly missing. Two backends implement
//! it:
//!
//! - [`FrameDataset`] - a polars `DataFrame` whose columns are all strings
//! - [`RecordDataset`] - plain in-memory [`Row`]s
//!
//! and [`Subset`] provides a row-filtered view over either of them, which is
//! how sampled groups are summarized without copying data.
//!
//! Statistics computed over any of these must be identical for the same
//! input, so nothing outside this module knows which backend it is using.

mod frame;
mod records;

pub use frame::{FrameDataset, read_csv_frame};
pub use records::{RecordDataset, Row};

use crate::config::Backend;
use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// An ordered, read-only table of optional raw values.
pub trait Dataset {
    /// Column names in schema order.
    fn column_names(&self) -> &[String];

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Raw value at `row` in `column`.
    ///
    /// `None` when the value is missing, the column is not in the schema or
    /// the row is out of range.
    fn value(&self, row: usize, column: &str) -> Option<&str>;

    /// All values of `column` in row order, or `None` for an unknown column.
    fn column_values(&self, column: &str) -> Option<Vec<Option<&str>>> {
        if !self.has_column(column) {
            return None;
        }
        Some((0..self.row_count()).map(|row| self.value(row, column)).collect())
    }

    fn has_column(&self, column: &str) -> bool {
        self.column_names().iter().any(|name| name == column)
    }

    fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// Rows of a parent dataset selected by index, in the given order.
pub struct Subset<'a> {
    parent: &'a dyn Dataset,
    rows: Vec<usize>,
}

impl<'a> Subset<'a> {
    /// Create a view over `rows` of `parent`. Indices past the end of the
    /// parent are dropped.
    pub fn new(parent: &'a dyn Dataset, rows: Vec<usize>) -> Self {
        let height = parent.row_count();
        let rows = rows.into_iter().filter(|&row| row < height).collect();
        Self { parent, rows }
    }

    /// Indices of the selected rows in the parent dataset.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }
}

impl Dataset for Subset<'_> {
    fn column_names(&self) -> &[String] {
        self.parent.column_names()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: &str) -> Option<&str> {
        let parent_row = *self.rows.get(row)?;
        self.parent.value(parent_row, column)
    }

    fn column_values(&self, column: &str) -> Option<Vec<Option<&str>>> {
        let all = self.parent.column_values(column)?;
        Some(self.rows.iter().map(|&row| all[row]).collect())
    }
}

/// Load a CSV file into the requested backend.
pub fn load_dataset(path: &Path, backend: Backend) -> Result<Box<dyn Dataset>> {
    let frame = FrameDataset::from_csv(path)?;
    debug!(
        "Loaded {} ({} rows x {} columns) into {:?} backend",
        path.display(),
        frame.row_count(),
        frame.column_names().len(),
        backend
    );

    match backend {
        Backend::Frame => Ok(Box::new(frame)),
        Backend::Records => Ok(Box::new(RecordDataset::from_dataset(&frame))),
    }
}
