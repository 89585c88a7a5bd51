//! Schema-driven selection of grouping key-sets.
//!
//! The rules are data: each one names the columns that identify a dataset
//! family and the key-sets to report for it. New families are added by
//! extending the table (in code or in the JSON config), not by adding
//! branches.

use crate::types::GroupKey;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One row of the grouping rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingRule {
    /// Family name, used in logs.
    pub name: String,
    /// The rule applies when all of these columns are present.
    pub requires: Vec<String>,
    /// Candidate key-sets, in report order. A key-set is only emitted when
    /// all of its columns are present.
    pub key_sets: Vec<Vec<String>>,
}

impl GroupingRule {
    pub fn new<I, S>(name: impl Into<String>, requires: I, key_sets: Vec<Vec<String>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            requires: requires.into_iter().map(Into::into).collect(),
            key_sets,
        }
    }

    /// Whether every required column is present.
    pub fn matches(&self, columns: &[String]) -> bool {
        self.requires.iter().all(|required| columns.contains(required))
    }
}

fn key_set(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

static DEFAULT_RULES: Lazy<Vec<GroupingRule>> = Lazy::new(|| {
    vec![
        // ad libraries: one page runs many ads
        GroupingRule::new(
            "ads",
            ["page_id", "ad_id"],
            vec![key_set(&["page_id"]), key_set(&["page_id", "ad_id"])],
        ),
        // page posts
        GroupingRule::new(
            "posts",
            ["Facebook_Id", "post_id"],
            vec![key_set(&["Facebook_Id"]), key_set(&["Facebook_Id", "post_id"])],
        ),
        // threaded messages; reply grouping only when the column exists
        GroupingRule::new(
            "threads",
            ["id"],
            vec![key_set(&["id"]), key_set(&["inReplyToId"])],
        ),
    ]
});

/// The built-in rule table.
pub fn default_grouping_rules() -> Vec<GroupingRule> {
    DEFAULT_RULES.clone()
}

/// Candidate key-sets for a schema.
///
/// Only the first matching rule applies. An empty list means no rule
/// matched and the report has no group sections.
pub fn select_group_keys(columns: &[String], rules: &[GroupingRule]) -> Vec<GroupKey> {
    let Some(rule) = rules.iter().find(|rule| rule.matches(columns)) else {
        return Vec::new();
    };

    rule.key_sets
        .iter()
        .filter(|key_set| key_set.iter().all(|column| columns.contains(column)))
        .filter_map(|key_set| GroupKey::new(key_set.iter().cloned()))
        .collect()
}

/// Name of the rule that applies to a schema, if any.
pub fn matching_rule<'a>(columns: &[String], rules: &'a [GroupingRule]) -> Option<&'a GroupingRule> {
    rules.iter().find(|rule| rule.matches(columns))
}
