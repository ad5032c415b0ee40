// file: src/classifier/rules.rs
// description: ordered keyword cascade for urgency level and category
// reference: https://docs.rs/regex

use crate::models::{ClassificationResult, ClassificationSource, TriageCategory, TriageLevel};
use lazy_static::lazy_static;
use regex::Regex;

/// Rule-based results are trusted less than the external classifier's default of 0.7.
pub const RULE_CONFIDENCE: f32 = 0.6;

// Keywords match anywhere in the text, except "ill" which must stand alone so "refill"
// never reads as Clinical.
lazy_static! {
    static ref LEVEL_RULES: Vec<(TriageLevel, Regex)> = vec![
        (
            TriageLevel::Urgent,
            Regex::new(r"(?i)(?:urgent|emergency|immediate|severe|critical|chest pain|difficulty breath)")
                .expect("urgent regex is valid"),
        ),
        (
            TriageLevel::High,
            Regex::new(r"(?i)(?:important|soon|high|abnormal|worsening)")
                .expect("high regex is valid"),
        ),
        (
            TriageLevel::Medium,
            Regex::new(r"(?i)(?:follow[ -]?up|medication|refill|results)")
                .expect("medium regex is valid"),
        ),
    ];

    static ref CATEGORY_RULES: Vec<(TriageCategory, Regex)> = vec![
        (
            TriageCategory::Clinical,
            Regex::new(r"(?i)(?:pain|symptom|fever|sick|\bill(?:ness)?\b|infection|condition|health concern)")
                .expect("clinical regex is valid"),
        ),
        (
            TriageCategory::Medication,
            Regex::new(r"(?i)(?:medication|prescription|refill|drug|dose)")
                .expect("medication regex is valid"),
        ),
        (
            TriageCategory::Administrative,
            Regex::new(r"(?i)(?:appointment|schedule|reschedule|cancel|availability)")
                .expect("administrative regex is valid"),
        ),
        (
            TriageCategory::LabResult,
            Regex::new(r"(?i)(?:lab|test|result|blood|urine|sample|specimen)")
                .expect("lab result regex is valid"),
        ),
        (
            TriageCategory::FollowUp,
            Regex::new(r"(?i)(?:follow[ -]?up|check[ -]?up|visit)")
                .expect("follow-up regex is valid"),
        ),
        (
            TriageCategory::Insurance,
            Regex::new(r"(?i)(?:insurance|coverage|payment|bill|cost)")
                .expect("insurance regex is valid"),
        ),
        (
            TriageCategory::Referral,
            Regex::new(r"(?i)(?:referral|specialist|consult)")
                .expect("referral regex is valid"),
        ),
    ];
}

/// Deterministic keyword classifier. Each axis is an independent first-match cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, subject: &str, content: &str) -> ClassificationResult {
        let combined = format!("{} {}", subject, content);

        ClassificationResult::new(
            self.level_for(&combined),
            self.category_for(&combined),
            RULE_CONFIDENCE,
            ClassificationSource::Rules,
        )
    }

    pub fn level_for(&self, text: &str) -> TriageLevel {
        LEVEL_RULES
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(level, _)| *level)
            .unwrap_or(TriageLevel::Low)
    }

    pub fn category_for(&self, text: &str) -> TriageCategory {
        CATEGORY_RULES
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(category, _)| *category)
            .unwrap_or(TriageCategory::Other)
    }
}
