// file: src/models/message.rs
// description: core message model and the closed triage vocabularies
// reference: internal data structures

use crate::error::TriageError;
use crate::models::classification::ClassificationSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Urgency bucket, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriageLevel {
    Urgent,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriageCategory {
    Clinical,
    Medication,
    Administrative,
    #[serde(rename = "Lab Result")]
    LabResult,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Insurance,
    Referral,
    Other,
}

impl TriageLevel {
    pub const ALL: [TriageLevel; 4] = [
        TriageLevel::Urgent,
        TriageLevel::High,
        TriageLevel::Medium,
        TriageLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriageLevel::Urgent => "Urgent",
            TriageLevel::High => "High",
            TriageLevel::Medium => "Medium",
            TriageLevel::Low => "Low",
        }
    }
}

impl TriageCategory {
    pub const ALL: [TriageCategory; 8] = [
        TriageCategory::Clinical,
        TriageCategory::Medication,
        TriageCategory::Administrative,
        TriageCategory::LabResult,
        TriageCategory::FollowUp,
        TriageCategory::Insurance,
        TriageCategory::Referral,
        TriageCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriageCategory::Clinical => "Clinical",
            TriageCategory::Medication => "Medication",
            TriageCategory::Administrative => "Administrative",
            TriageCategory::LabResult => "Lab Result",
            TriageCategory::FollowUp => "Follow-up",
            TriageCategory::Insurance => "Insurance",
            TriageCategory::Referral => "Referral",
            TriageCategory::Other => "Other",
        }
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TriageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cases and drops separators so "Lab Result", "lab-result" and "LAB_RESULT" agree.
fn vocabulary_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for TriageLevel {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = vocabulary_key(s);
        TriageLevel::ALL
            .into_iter()
            .find(|level| vocabulary_key(level.as_str()) == key)
            .ok_or_else(|| TriageError::Validation(format!("Unknown triage level: {}", s)))
    }
}

impl FromStr for TriageCategory {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = vocabulary_key(s);
        TriageCategory::ALL
            .into_iter()
            .find(|category| vocabulary_key(category.as_str()) == key)
            .ok_or_else(|| TriageError::Validation(format!("Unknown triage category: {}", s)))
    }
}

/// A classified inbox message. Built once by ingestion (or the mock data set) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub subject: String,
    pub content: String,
    pub datetime: DateTime<Utc>,
    pub triage_level: TriageLevel,
    pub triage_category: TriageCategory,
    pub classified_by: ClassificationSource,
}

impl Message {
    pub const DEFAULT_SUBJECT: &'static str = "No Subject";

    pub fn matches_text(&self, needle_lowercase: &str) -> bool {
        self.subject.to_lowercase().contains(needle_lowercase)
            || self.content.to_lowercase().contains(needle_lowercase)
    }
}
