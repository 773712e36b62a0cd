use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::plugins::PluginRecord;

/// Label of the group that collects records no rule matched.
pub const FALLBACK_GROUP: &str = "other";

/// A group label and the name keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl GroupRule {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Whether any keyword occurs in `name` (case-sensitive).
    pub fn matches(&self, name: &str) -> bool {
        self.keywords.iter().any(|kw| name.contains(kw.as_str()))
    }
}

/// Label of the first rule that matches `name`, or [`FALLBACK_GROUP`].
pub fn classify<'a>(rules: &'a [GroupRule], name: &str) -> &'a str {
    rules
        .iter()
        .find(|rule| rule.matches(name))
        .map_or(FALLBACK_GROUP, |rule| rule.label.as_str())
}

/// Records bucketed by group, in the order each group was first seen.
/// The fallback bucket is kept apart so it can always come last.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    groups: Vec<(String, Vec<PluginRecord>)>,
    index: FxHashMap<String, usize>,
    fallback: Vec<PluginRecord>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `record` to the group `label`, returning the updated grouping.
    pub fn with(mut self, label: &str, record: PluginRecord) -> Self {
        if label == FALLBACK_GROUP {
            self.fallback.push(record);
            return self;
        }

        match self.index.get(label) {
            Some(&i) => self.groups[i].1.push(record),
            None => {
                self.index.insert(label.to_string(), self.groups.len());
                self.groups.push((label.to_string(), vec![record]));
            }
        }
        self
    }

    /// Non-fallback groups in first-seen order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[PluginRecord])> {
        self.groups
            .iter()
            .map(|(label, records)| (label.as_str(), records.as_slice()))
    }

    pub fn fallback(&self) -> &[PluginRecord] {
        &self.fallback
    }

    /// Every group in render order: first-seen, then the fallback.
    /// The fallback is always present, even when it holds no records.
    pub fn ordered(&self) -> impl Iterator<Item = (&str, &[PluginRecord])> {
        self.groups().chain(std::iter::once((FALLBACK_GROUP, self.fallback())))
    }

    /// Total number of records across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, r)| r.len()).sum::<usize>() + self.fallback.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify every record and collect the results.
pub fn group_records<I>(rules: &[GroupRule], records: I) -> Grouping
where
    I: IntoIterator<Item = PluginRecord>,
{
    records.into_iter().fold(Grouping::new(), |grouping, record| {
        let label = classify(rules, &record.name);
        grouping.with(label, record)
    })
}
