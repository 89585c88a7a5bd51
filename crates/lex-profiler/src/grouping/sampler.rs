//! Representative group sampling.
//!
//! Only one group per key-set is ever reported: the group of the first row,
//! in ingestion order, whose key columns are all present. This keeps the
//! report bounded no matter how many distinct keys a dataset has. The choice
//! depends on row order only; it is not the alphabetically first key.

use crate::source::{Dataset, Subset};
use crate::types::GroupKey;
use crate::utils::present;

/// The sampled group of one key-set.
pub struct GroupSample<'a> {
    pub key: GroupKey,
    /// Key values shared by every row of the sample.
    pub key_tuple: Vec<String>,
    /// Matching rows, in row order.
    pub rows: Subset<'a>,
}

impl GroupSample<'_> {
    pub fn row_count(&self) -> usize {
        self.rows.row_count()
    }
}

/// Sample the first-seen group of `key`.
///
/// Rows missing any key column, or holding an empty string in one, are
/// skipped. Returns `None` when no row has
/// a complete key, including when a key column is not in the schema.
pub fn sample_first_group<'a>(dataset: &'a dyn Dataset, key: &GroupKey) -> Option<GroupSample<'a>> {
    let projected: Vec<Vec<Option<&str>>> = key
        .columns()
        .iter()
        .map(|column| dataset.column_values(column))
        .collect::<Option<_>>()?;

    let key_at = |row: usize| -> Option<Vec<&str>> {
        projected.iter().map(|values| present(values[row])).collect()
    };

    let (first_row, key_tuple) = (0..dataset.row_count())
        .find_map(|row| key_at(row).map(|tuple| (row, tuple)))?;

    let rows: Vec<usize> = (first_row..dataset.row_count())
        .filter(|&row| key_at(row).as_ref() == Some(&key_tuple))
        .collect();

    Some(GroupSample {
        key: key.clone(),
        key_tuple: key_tuple.iter().map(|v| v.to_string()).collect(),
        rows: Subset::new(dataset, rows),
    })
}
