// file: src/parser/schema.rs
// description: delimiter sniffing and required column validation on the header line
// reference: https://docs.python.org/3/library/csv.html#csv.Sniffer

use crate::error::{Result, TriageError};
use tracing::debug;

/// Candidate field delimiters in tie-break order.
pub const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

pub const REQUIRED_COLUMNS: [&str; 4] = ["message_id", "subject", "message", "datetime"];

/// Positions of the required columns within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: usize,
    pub subject: usize,
    pub message: usize,
    pub datetime: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub delimiter: char,
    pub headers: Vec<String>,
    pub columns: ColumnMap,
    /// Zero-based index of the header line within the normalized text.
    pub header_line: usize,
}

impl Schema {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Picks the candidate with the strictly highest count on `header`; earlier candidates
/// win ties and a header with no candidate at all falls back to a comma.
pub fn detect_delimiter(header: &str) -> char {
    let mut best = ',';
    let mut best_count = 0;

    for candidate in CANDIDATE_DELIMITERS {
        let count = header.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    best
}

pub struct SchemaDetector;

impl SchemaDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> Result<Schema> {
        let non_blank = text.lines().filter(|line| !line.trim().is_empty()).count();
        if non_blank <= 1 {
            return Err(TriageError::EmptyInput);
        }

        let (header_line, header) = text
            .split('\n')
            .enumerate()
            .find(|(_, line)| !line.trim().is_empty())
            .ok_or(TriageError::EmptyInput)?;

        let delimiter = detect_delimiter(header);
        debug!("Detected delimiter: {:?}", delimiter);

        let headers: Vec<String> = header
            .split(delimiter)
            .map(|token| token.trim().trim_matches('"').trim().to_lowercase())
            .collect();
        debug!("Detected headers: {:?}", headers);

        let positions =
            REQUIRED_COLUMNS.map(|name| headers.iter().position(|header| header == name));

        let columns = match positions {
            [Some(id), Some(subject), Some(message), Some(datetime)] => ColumnMap {
                id,
                subject,
                message,
                datetime,
            },
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .zip(positions)
                    .filter(|(_, position)| position.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                return Err(TriageError::Schema { missing });
            }
        };

        Ok(Schema {
            delimiter,
            headers,
            columns,
            header_line,
        })
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delimiter_is_argmax() {
        assert_eq!(detect_delimiter("a;b;c"), ';');
        assert_eq!(detect_delimiter("a,b,c"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_delimiter_defaults_to_comma() {
        assert_eq!(detect_delimiter("single_column"), ',');
        assert_eq!(detect_delimiter(""), ',');
    }

    #[test]
    fn test_delimiter_ties_go_to_earlier_candidate() {
        assert_eq!(detect_delimiter("a;b,c"), ',');
        assert_eq!(detect_delimiter("a|b;c"), ';');
    }

    #[test]
    fn test_detects_columns_case_insensitively() {
        let text = "Message_ID;SUBJECT;Message;DateTime;extra\n1;Hi;Body;2023-05-15\n";
        let schema = SchemaDetector::new().detect(text).unwrap();

        assert_eq!(schema.delimiter, ';');
        assert_eq!(schema.column_count(), 5);
        assert_eq!(
            schema.columns,
            ColumnMap {
                id: 0,
                subject: 1,
                message: 2,
                datetime: 3
            }
        );
    }

    #[test]
    fn test_missing_columns_are_all_named() {
        let text = "message_id,body,when\n1,hello,today\n";
        let err = SchemaDetector::new().detect(text).unwrap_err();

        match err {
            TriageError::Schema { missing } => {
                assert_eq!(missing, vec!["subject", "message", "datetime"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_is_empty_input() {
        let detector = SchemaDetector::new();
        assert!(matches!(
            detector.detect("message_id,subject,message,datetime\n"),
            Err(TriageError::EmptyInput)
        ));
        assert!(matches!(detector.detect(""), Err(TriageError::EmptyInput)));
    }

    #[test]
    fn test_leading_blank_lines_skipped_before_header() {
        let text = "\n  \nmessage_id,subject,message,datetime\n1,a,b,c\n";
        let schema = SchemaDetector::new().detect(text).unwrap();

        assert_eq!(schema.header_line, 2);
        assert_eq!(schema.delimiter, ',');
        assert_eq!(schema.columns.datetime, 3);
    }

    #[test]
    fn test_no_fuzzy_header_matching() {
        let text = "message id,subject,message,datetime\n1,a,b,c\n";
        let err = SchemaDetector::new().detect(text).unwrap_err();
        assert!(matches!(err, TriageError::Schema { ref missing } if missing == &["message_id"]));
    }
}
