//! Column classification from a bounded sample of leading rows.

use crate::source::Dataset;
use crate::types::{ColumnClassification, ColumnKind};
use crate::utils::parse_optional_numeric;

/// Classify every schema column as numeric or categorical.
///
/// Each column is judged on its first `sample_size` rows (all rows when
/// fewer exist). Missing and unparsable values count against the column.
/// A dataset without rows yields an empty classification.
pub(crate) fn classify_columns(
    dataset: &dyn Dataset,
    sample_size: usize,
    min_numeric_ratio: f64,
) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    if dataset.is_empty() {
        return classification;
    }

    let sampled = sample_size.min(dataset.row_count());
    for column in dataset.column_names() {
        let kind = infer_column_kind(dataset, column, sampled, min_numeric_ratio);
        classification.push(column.clone(), kind);
    }

    classification
}

/// Kind of one column given the number of leading rows to inspect.
pub(crate) fn infer_column_kind(
    dataset: &dyn Dataset,
    column: &str,
    sampled: usize,
    min_numeric_ratio: f64,
) -> ColumnKind {
    if sampled == 0 {
        return ColumnKind::Categorical;
    }

    let parsed = (0..sampled)
        .filter(|&row| parse_optional_numeric(dataset.value(row, column)).is_some())
        .count();

    // compare counts, not a rounded ratio
    if parsed as f64 >= min_numeric_ratio * sampled as f64 {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{RecordDataset, Row};

    fn column_dataset(values: &[Option<&str>]) -> RecordDataset {
        let rows = values
            .iter()
            .map(|v| match v {
                Some(v) => Row::new().with("col", *v),
                None => Row::new(),
            })
            .collect();
        RecordDataset::new(["col"], rows)
    }

    #[test]
    fn test_all_numeric() {
        let dataset = column_dataset(&[Some("1"), Some("2.5"), Some(" 1,000 ")]);
        assert_eq!(infer_column_kind(&dataset, "col", 3, 0.8), ColumnKind::Numeric);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 4 of 5 parse: exactly 0.8
        let dataset = column_dataset(&[Some("1"), Some("2"), Some("3"), Some("4"), Some("x")]);
        assert_eq!(infer_column_kind(&dataset, "col", 5, 0.8), ColumnKind::Numeric);
    }

    #[test]
    fn test_missing_values_count_as_failures() {
        let dataset = column_dataset(&[Some("1"), None, None, Some("4"), Some("5")]);
        assert_eq!(infer_column_kind(&dataset, "col", 5, 0.8), ColumnKind::Categorical);
    }

    #[test]
    fn test_only_leading_rows_are_sampled() {
        let mut values = vec![Some("1"); 20];
        values.extend(vec![Some("text"); 30]);
        let dataset = column_dataset(&values);

        let classification = classify_columns(&dataset, 20, 0.8);
        assert_eq!(classification.numeric, vec!["col"]);
    }

    #[test]
    fn test_sample_larger_than_dataset() {
        let dataset = column_dataset(&[Some("a"), Some("b")]);
        let classification = classify_columns(&dataset, 20, 0.8);
        assert_eq!(classification.categorical, vec!["col"]);
    }

    #[test]
    fn test_empty_dataset_has_empty_classification() {
        let dataset = RecordDataset::new(["a", "b"], Vec::new());
        let classification = classify_columns(&dataset, 20, 0.8);
        assert!(classification.is_empty());
        assert!(classification.numeric.is_empty());
        assert!(classification.categorical.is_empty());
    }

    #[test]
    fn test_classification_is_a_partition_of_the_schema() {
        let dataset = RecordDataset::new(
            ["id", "name", "score", "note"],
            vec![
                Row::new().with("id", "1").with("name", "a").with("score", "3.5"),
                Row::new().with("id", "2").with("name", "b").with("note", "x"),
            ],
        );
        let classification = classify_columns(&dataset, 20, 0.8);

        let mut union: Vec<String> = classification
            .numeric
            .iter()
            .chain(&classification.categorical)
            .cloned()
            .collect();
        union.sort();
        let mut schema = dataset.column_names().to_vec();
        schema.sort();
        assert_eq!(union, schema);
        assert!(
            classification
                .numeric
                .iter()
                .all(|c| !classification.categorical.contains(c))
        );
    }
}
