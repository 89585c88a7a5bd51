//! In-memory row backend.

use super::Dataset;
use std::collections::{HashMap, HashSet};

/// One record: column name to optional raw value.
///
/// A column that was never set is missing, exactly like one set with
/// [`Row::with_missing`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: HashMap<String, Option<String>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a present value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(column.into(), Some(value.into()));
        self
    }

    /// Mark a column as explicitly missing.
    pub fn with_missing(mut self, column: impl Into<String>) -> Self {
        self.values.insert(column.into(), None);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(|v| v.as_deref())
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }
}

/// A dataset held as a vector of [`Row`]s with an explicit schema.
#[derive(Debug, Clone, Default)]
pub struct RecordDataset {
    columns: Vec<String>,
    // membership lookups for per-cell reads
    schema: HashSet<String>,
    rows: Vec<Row>,
}

impl RecordDataset {
    /// Create a dataset from a schema and rows.
    ///
    /// Rows may carry fewer keys than the schema; absent keys read as
    /// missing. Keys outside the schema are ignored.
    pub fn new<I, S>(columns: I, rows: Vec<Row>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        Self {
            schema: columns.iter().cloned().collect(),
            columns,
            rows,
        }
    }

    /// Copy any dataset into records, row by row.
    pub fn from_dataset(source: &dyn Dataset) -> Self {
        let columns = source.column_names().to_vec();
        let projected: Vec<Vec<Option<&str>>> = columns
            .iter()
            .map(|column| source.column_values(column).unwrap_or_default())
            .collect();

        let rows = (0..source.row_count())
            .map(|row| {
                columns
                    .iter()
                    .zip(&projected)
                    .map(|(column, values)| {
                        (column.as_str(), values.get(row).copied().flatten())
                    })
                    .collect::<Row>()
            })
            .collect();

        Self::new(columns, rows)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl Dataset for RecordDataset {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: &str) -> Option<&str> {
        if !self.has_column(column) {
            return None;
        }
        self.rows.get(row)?.get(column)
    }

    fn column_values(&self, column: &str) -> Option<Vec<Option<&str>>> {
        if !self.has_column(column) {
            return None;
        }
        Some(self.rows.iter().map(|row| row.get(column)).collect())
    }

    fn has_column(&self, column: &str) -> bool {
        self.schema.contains(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_missing_key_reads_as_missing() {
        let row = Row::new().with("id", "1").with_missing("val");
        assert_eq!(row.get("id"), Some("1"));
        assert_eq!(row.get("val"), None);
        assert_eq!(row.get("other"), None);
    }

    #[test]
    fn test_row_from_iter() {
        let row: Row = vec![("a", Some("1")), ("b", None)].into_iter().collect();
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), None);
    }

    #[test]
    fn test_record_dataset_ignores_columns_outside_schema() {
        let dataset = RecordDataset::new(["id"], vec![Row::new().with("id", "1").with("extra", "x")]);
        assert_eq!(dataset.value(0, "id"), Some("1"));
        assert_eq!(dataset.value(0, "extra"), None);
        assert_eq!(dataset.column_values("extra"), None);
    }

    #[test]
    fn test_wide_schema_lookups() {
        let columns: Vec<String> = (0..200).map(|i| format!("c{}", i)).collect();
        let rows = (0..3)
            .map(|r| Row::new().with("c199", r.to_string()).with("c0", "x"))
            .collect();
        let dataset = RecordDataset::new(columns.clone(), rows);

        assert!(dataset.has_column("c0"));
        assert!(dataset.has_column("c199"));
        assert!(!dataset.has_column("c200"));
        assert_eq!(dataset.column_names(), columns.as_slice());
        assert_eq!(
            dataset.column_values("c199"),
            Some(vec![Some("0"), Some("1"), Some("2")])
        );
        assert_eq!(dataset.column_values("c5"), Some(vec![None, None, None]));
        assert_eq!(dataset.value(1, "c0"), Some("x"));
    }

    #[test]
    fn test_from_dataset_copies_rows() {
        let original = RecordDataset::new(
            ["id", "val"],
            vec![
                Row::new().with("id", "1"),
                Row::new().with("id", "2").with("val", "x"),
            ],
        );
        let copy = RecordDataset::from_dataset(&original);

        assert_eq!(copy.column_names(), original.column_names());
        assert_eq!(copy.rows().len(), 2);
        assert_eq!(copy.value(0, "val"), None);
        assert_eq!(copy.value(1, "val"), Some("x"));
    }
}
