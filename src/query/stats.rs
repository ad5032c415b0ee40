// file: src/query/stats.rs
// description: per-level and per-category message counts for the dashboard summary
// reference: internal query layer

use crate::models::{Message, TriageCategory, TriageLevel};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageSummary {
    pub total: usize,
    /// Always holds all four levels.
    pub by_level: BTreeMap<TriageLevel, usize>,
    /// Only categories that occur in the batch.
    pub by_category: BTreeMap<TriageCategory, usize>,
}

impl TriageSummary {
    pub fn from_messages<'a, I>(messages: I) -> Self
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let mut by_level: BTreeMap<TriageLevel, usize> =
            TriageLevel::ALL.into_iter().map(|level| (level, 0)).collect();
        let mut by_category = BTreeMap::new();
        let mut total = 0;

        for message in messages {
            total += 1;
            *by_level.entry(message.triage_level).or_insert(0) += 1;
            *by_category.entry(message.triage_category).or_insert(0) += 1;
        }

        Self {
            total,
            by_level,
            by_category,
        }
    }

    pub fn count_for_level(&self, level: TriageLevel) -> usize {
        self.by_level.get(&level).copied().unwrap_or(0)
    }

    pub fn count_for_category(&self, category: TriageCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    /// All eight categories, zero-filled where absent.
    pub fn category_counts_with_zeros(&self) -> BTreeMap<TriageCategory, usize> {
        TriageCategory::ALL
            .into_iter()
            .map(|category| (category, self.count_for_category(category)))
            .collect()
    }

    pub fn share_of_level(&self, level: TriageLevel) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.count_for_level(level) as f64 / self.total as f64) * 100.0
    }
}
