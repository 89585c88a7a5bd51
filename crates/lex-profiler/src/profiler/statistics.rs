//! Numeric and categorical summarizers.

use crate::types::{CategoricalStats, NumericStats, SummaryStats};
use crate::utils::{is_null_like, parse_optional_numeric, present};
use std::collections::HashMap;

/// Summarize values as numbers.
///
/// Missing and unparsable values are excluded. No eligible value gives
/// [`SummaryStats::Empty`].
pub fn summarize_numeric(values: &[Option<&str>]) -> SummaryStats {
    let numbers: Vec<f64> = values
        .iter()
        .filter_map(|v| parse_optional_numeric(*v))
        .collect();

    if numbers.is_empty() {
        return SummaryStats::Empty;
    }

    let count = numbers.len();
    let mean = numbers.iter().sum::<f64>() / count as f64;
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std = calculate_std(&numbers, mean);

    SummaryStats::Numeric(NumericStats {
        count,
        mean,
        min,
        max,
        std,
    })
}

/// Sample standard deviation (denominator `n - 1`); `0.0` below two values.
pub(crate) fn calculate_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

/// Summarize values as categories.
///
/// Missing, empty and null-token values are excluded; `null_tokens` must
/// already be normalized (see [`crate::utils::normalize_token`]). The mode is
/// the most frequent value; among equally frequent values the one that
/// occurs first in the input wins.
pub fn summarize_categorical(values: &[Option<&str>], null_tokens: &[String]) -> SummaryStats {
    // value -> (first position, frequency)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut count = 0;

    for value in values.iter().filter_map(|v| present(*v)) {
        if is_null_like(value, null_tokens) {
            continue;
        }
        let entry = counts.entry(value).or_insert((count, 0));
        entry.1 += 1;
        count += 1;
    }

    let Some((mode, (_, mode_count))) = counts
        .iter()
        .max_by(|(_, (first_a, freq_a)), (_, (first_b, freq_b))| {
            freq_a.cmp(freq_b).then(first_b.cmp(first_a))
        })
    else {
        return SummaryStats::Empty;
    };

    SummaryStats::Categorical(CategoricalStats {
        count,
        unique: counts.len(),
        mode: mode.to_string(),
        mode_count: *mode_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::default_null_tokens;

    fn some(values: &[&'static str]) -> Vec<Option<&'static str>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    fn numeric(stats: SummaryStats) -> NumericStats {
        match stats {
            SummaryStats::Numeric(stats) => stats,
            other => panic!("expected numeric stats, got {:?}", other),
        }
    }

    fn categorical(stats: SummaryStats) -> CategoricalStats {
        match stats {
            SummaryStats::Categorical(stats) => stats,
            other => panic!("expected categorical stats, got {:?}", other),
        }
    }

    // ==================== summarize_numeric tests ====================

    #[test]
    fn test_numeric_basic() {
        let stats = numeric(summarize_numeric(&some(&["10", "20", "30"])));
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.std, 10.0);
    }

    #[test]
    fn test_numeric_excludes_missing_and_unparsable() {
        let values = vec![Some("1"), None, Some("abc"), Some("3"), Some("")];
        let stats = numeric(summarize_numeric(&values));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
    }

    #[test]
    fn test_numeric_single_value_has_zero_std() {
        let stats = numeric(summarize_numeric(&some(&["5"])));
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, 0.0);
        assert!(!stats.std.is_nan());
    }

    #[test]
    fn test_numeric_no_eligible_values_is_empty() {
        assert_eq!(summarize_numeric(&[None, Some("x")]), SummaryStats::Empty);
        assert_eq!(summarize_numeric(&[]), SummaryStats::Empty);
    }

    #[test]
    fn test_numeric_thousands_separators() {
        let stats = numeric(summarize_numeric(&some(&["1,000", " 2,000 "])));
        assert_eq!(stats.min, 1000.0);
        assert_eq!(stats.max, 2000.0);
    }

    #[test]
    fn test_calculate_std_basic() {
        // Values: 1..5, mean 3, variance 10/4
        let std = calculate_std(&[1.0, 2.0, 3.0, 4.0, 5.0], 3.0);
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_std_identical_values() {
        assert_eq!(calculate_std(&[5.0, 5.0, 5.0], 5.0), 0.0);
    }

    // ==================== summarize_categorical tests ====================

    #[test]
    fn test_categorical_basic() {
        let tokens = default_null_tokens();
        let stats = categorical(summarize_categorical(&some(&["x", "y", "x", "NA", "x"]), &tokens));
        assert_eq!(stats.count, 4);
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.mode, "x");
        assert_eq!(stats.mode_count, 3);
    }

    #[test]
    fn test_categorical_null_tokens_are_case_insensitive() {
        let tokens = default_null_tokens();
        let values = some(&["n/a", " null ", "Na", "a"]);
        let stats = categorical(summarize_categorical(&values, &tokens));
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mode, "a");
    }

    #[test]
    fn test_categorical_all_null_tokens_is_empty() {
        let tokens = default_null_tokens();
        let values = vec![Some("NA"), Some("NULL"), None, Some("")];
        assert_eq!(summarize_categorical(&values, &tokens), SummaryStats::Empty);
    }

    #[test]
    fn test_categorical_tie_uses_first_occurrence() {
        let tokens = default_null_tokens();
        let stats = categorical(summarize_categorical(&some(&["b", "a", "a", "b", "c"]), &tokens));
        assert_eq!(stats.mode, "b");
        assert_eq!(stats.mode_count, 2);

        let stats = categorical(summarize_categorical(&some(&["a", "b", "b", "a"]), &tokens));
        assert_eq!(stats.mode, "a");
    }

    #[test]
    fn test_categorical_tie_is_stable_across_runs() {
        let tokens = default_null_tokens();
        let values = some(&["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"]);
        let first = summarize_categorical(&values, &tokens);
        for _ in 0..50 {
            assert_eq!(summarize_categorical(&values, &tokens), first);
        }
        assert_eq!(categorical(first).mode, "q");
    }

    #[test]
    fn test_categorical_values_are_not_trimmed() {
        let tokens = default_null_tokens();
        let stats = categorical(summarize_categorical(&some(&["a", "a ", "a"]), &tokens));
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.mode_count, 2);
    }

    #[test]
    fn test_categorical_whitespace_is_a_value() {
        let tokens = default_null_tokens();
        let stats = categorical(summarize_categorical(&[Some("   "), Some("x"), Some("")], &tokens));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.mode, "   ");
    }

    #[test]
    fn test_categorical_custom_tokens() {
        let tokens = vec!["NONE".to_string()];
        let stats = categorical(summarize_categorical(&some(&["none", "NA", "NA"]), &tokens));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mode, "NA");
    }
}
