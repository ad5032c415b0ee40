// file: src/classifier/mod.rs
// description: message classification module exports and the external classifier seam
// reference: internal module structure

pub mod llm;
pub mod rules;

use crate::error::Result;
use crate::models::ClassificationResult;
use std::future::Future;

pub use llm::{LlmClassifier, build_prompt, extract_json_object, parse_reply};
pub use rules::{RULE_CONFIDENCE, RuleEngine};

/// A remote classifier consulted before the rule engine.
///
/// The ingestion pipeline calls `classify` at most once per message and treats any
/// error as a signal to fall back to [`RuleEngine`] for that message.
pub trait ExternalClassifier {
    /// Whether a credential is configured. Without one the pipeline skips the
    /// external pass entirely.
    fn has_credential(&self) -> bool;

    fn classify(
        &self,
        subject: &str,
        content: &str,
    ) -> impl Future<Output = Result<ClassificationResult>> + Send;
}
