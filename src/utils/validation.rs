// file: src/utils/validation.rs
// description: input validation for uploads and endpoint settings
// reference: input validation patterns

use crate::error::{Result, TriageError};
use std::path::Path;

pub struct Validator;

impl Validator {
    /// Uploads must be regular files with a `.csv` extension.
    pub fn validate_csv_file(path: &Path) -> Result<()> {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

        if !is_csv {
            return Err(TriageError::Validation(format!(
                "Invalid file type, please upload a CSV file: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(TriageError::Validation(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(TriageError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(TriageError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_api_key(key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(TriageError::Validation("API key is empty".to_string()));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(TriageError::Validation(
                "API key must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }

    /// Shortens on a character boundary and appends an ellipsis.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        }
    }
}
