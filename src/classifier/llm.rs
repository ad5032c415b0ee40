// file: src/classifier/llm.rs
// description: chat-completions integration for message triage
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::classifier::ExternalClassifier;
use crate::config::ClassifierConfig;
use crate::error::{Result, TriageError};
use crate::models::{ClassificationResult, ClassificationSource, TriageCategory, TriageLevel};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Confidence assumed when the model omits one.
pub const DEFAULT_EXTERNAL_CONFIDENCE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

pub struct LlmClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl LlmClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn classify_message(
        &self,
        subject: &str,
        content: &str,
    ) -> Result<ClassificationResult> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(TriageError::MissingCredential)?;

        let prompt = build_prompt(subject, content);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.config.temperature,
        };

        debug!(
            "Requesting classification from {} for {} chars",
            self.config.endpoint,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TriageError::Endpoint(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TriageError::Endpoint(format!(
                "status {}: {}",
                status,
                remote_error_message(&body)
            )));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            TriageError::MalformedResponse(format!("response body is not valid JSON: {}", e))
        })?;

        let reply = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TriageError::MalformedResponse("reply has no content".to_string()))?;

        debug!("Classification reply: {}", reply);
        parse_reply(&reply)
    }
}

impl ExternalClassifier for LlmClassifier {
    fn has_credential(&self) -> bool {
        self.config.has_credential()
    }

    async fn classify(&self, subject: &str, content: &str) -> Result<ClassificationResult> {
        self.classify_message(subject, content).await
    }
}

pub fn build_prompt(subject: &str, content: &str) -> String {
    format!(
        r#"You are a medical message classifier for a healthcare provider's inbox system.
You need to classify the following message based on its content and urgency.

Subject: {subject}
Message: {content}

Based on the message content, classify it into:

1. Triage Level (choose exactly one):
- "Urgent": Critical issues requiring immediate attention (<1 hour)
- "High": Important issues requiring prompt attention (1-4 hours)
- "Medium": Standard issues requiring timely response (same day)
- "Low": Routine matters (1-2 business days)

2. Category (choose exactly one):
- "Clinical": Medical symptoms or clinical concerns
- "Medication": Medication-related inquiries
- "Administrative": Non-clinical administrative matters
- "Lab Result": Questions about laboratory results
- "Follow-up": Post-visit or procedure follow-up
- "Insurance": Insurance-related inquiries
- "Referral": Requests for specialist referrals
- "Other": Messages that don't fit other categories

Return your classification as a single JSON object in this format:
{{
  "triage_level": "Urgent/High/Medium/Low",
  "triage_category": "Clinical/Medication/Administrative/Lab Result/Follow-up/Insurance/Referral/Other",
  "confidence": 0.95
}}
"#
    )
}

/// Prefers the endpoint's `error.message`, falling back to the raw body.
fn remote_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown error".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

/// Returns the first balanced `{...}` span in `text`, ignoring braces inside JSON
/// string literals.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses the model's free-text reply into a classification.
pub fn parse_reply(reply: &str) -> Result<ClassificationResult> {
    let object = extract_json_object(reply).ok_or_else(|| {
        TriageError::MalformedResponse("could not extract JSON from reply".to_string())
    })?;

    let value: Value = serde_json::from_str(object)
        .map_err(|e| TriageError::MalformedResponse(format!("invalid JSON object: {}", e)))?;

    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TriageError::MalformedResponse(format!("missing field {}", name)))
    };

    let level: TriageLevel = field("triage_level")?
        .parse()
        .map_err(|e: TriageError| TriageError::MalformedResponse(e.to_string()))?;
    let category: TriageCategory = field("triage_category")?
        .parse()
        .map_err(|e: TriageError| TriageError::MalformedResponse(e.to_string()))?;

    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .map(|c| c as f32)
        .filter(|c| c.is_finite() && *c > 0.0)
        .unwrap_or(DEFAULT_EXTERNAL_CONFIDENCE);

    Ok(ClassificationResult::new(
        level,
        category,
        confidence,
        ClassificationSource::External,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_message_and_vocabulary() {
        let prompt = build_prompt("Refill", "Need lisinopril");
        assert!(prompt.contains("Subject: Refill"));
        assert!(prompt.contains("Message: Need lisinopril"));
        assert!(prompt.contains("\"Lab Result\""));
        assert!(prompt.contains("\"triage_level\""));
    }

    #[test]
    fn test_extracts_first_object_from_chatter() {
        let reply = "Sure! Here it is:\n{\"triage_level\": \"High\", \"note\": \"}\"} and {\"x\": 1}";
        assert_eq!(
            extract_json_object(reply),
            Some("{\"triage_level\": \"High\", \"note\": \"}\"}")
        );
    }

    #[test]
    fn test_nested_object_is_balanced() {
        let reply = "{\"a\": {\"b\": 1}, \"c\": 2} trailing";
        assert_eq!(extract_json_object(reply), Some("{\"a\": {\"b\": 1}, \"c\": 2}"));
    }

    #[test]
    fn test_no_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{ unterminated"), None);
    }

    #[test]
    fn test_parse_reply_success() {
        let reply = r#"```json
{"triage_level": "Urgent", "triage_category": "Lab Result", "confidence": 0.92}
```"#;
        let result = parse_reply(reply).unwrap();
        assert_eq!(result.level, TriageLevel::Urgent);
        assert_eq!(result.category, TriageCategory::LabResult);
        assert!((result.confidence - 0.92).abs() < 1e-6);
        assert_eq!(result.source, ClassificationSource::External);
    }

    #[test]
    fn test_parse_reply_defaults_confidence() {
        let result =
            parse_reply(r#"{"triage_level": "Low", "triage_category": "Other"}"#).unwrap();
        assert_eq!(result.confidence, DEFAULT_EXTERNAL_CONFIDENCE);
    }

    #[test]
    fn test_parse_reply_missing_field() {
        let err = parse_reply(r#"{"triage_level": "Low"}"#).unwrap_err();
        assert!(matches!(err, TriageError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_reply_rejects_unknown_vocabulary() {
        let err = parse_reply(r#"{"triage_level": "Critical", "triage_category": "Other"}"#)
            .unwrap_err();
        assert!(matches!(err, TriageError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_reply_without_json() {
        let err = parse_reply("I think this is urgent").unwrap_err();
        assert!(matches!(err, TriageError::MalformedResponse(_)));
    }

    #[test]
    fn test_remote_error_message_prefers_error_field() {
        assert_eq!(
            remote_error_message(r#"{"error": {"message": "Invalid API key"}}"#),
            "Invalid API key"
        );
        assert_eq!(remote_error_message("gateway timeout"), "gateway timeout");
        assert_eq!(remote_error_message(""), "Unknown error");
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let classifier = LlmClassifier::new(ClassifierConfig::default());
        assert_eq!(classifier.model(), "gpt-4o-mini");
        assert!(!classifier.has_credential());
        let err = classifier.classify_message("a", "b").await.unwrap_err();
        assert!(matches!(err, TriageError::MissingCredential));
    }
}
