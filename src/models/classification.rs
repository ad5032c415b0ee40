// file: src/models/classification.rs
// description: classification result and provenance tag
// reference: internal data structures

use crate::models::message::{TriageCategory, TriageLevel};
use serde::{Deserialize, Serialize};

/// Which classifier produced a message's level and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    External,
    Rules,
    /// The external classifier was tried for this row and failed.
    RuleFallback,
    /// Labels shipped with the built-in sample data.
    Preset,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub level: TriageLevel,
    pub category: TriageCategory,
    /// Advisory only, never used for control flow.
    pub confidence: f32,
    pub source: ClassificationSource,
}

impl ClassificationResult {
    pub fn new(
        level: TriageLevel,
        category: TriageCategory,
        confidence: f32,
        source: ClassificationSource,
    ) -> Self {
        Self {
            level,
            category,
            confidence: confidence.clamp(0.0, 1.0),
            source,
        }
    }

    pub fn with_source(mut self, source: ClassificationSource) -> Self {
        self.source = source;
        self
    }
}
