//! Grouped analysis: which key-sets to report, and which group to show.

mod keys;
mod sampler;

pub use keys::{GroupingRule, default_grouping_rules, matching_rule, select_group_keys};
pub use sampler::{GroupSample, sample_first_group};
