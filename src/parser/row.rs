// file: src/parser/row.rs
// description: quote-aware field splitting for a single delimited line
// reference: https://www.rfc-editor.org/rfc/rfc4180

use crate::config::OverflowPolicy;
use crate::error::{Result, TriageError};
use crate::parser::schema::Schema;

/// Splits `line` on `delimiter` outside of double quotes.
///
/// Every `"` toggles the quoted state and is itself dropped, so `""` inside a quoted
/// field collapses to nothing rather than to a literal quote. An unterminated quote
/// simply swallows the rest of the line into the last field.
pub fn parse_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            inside_quotes = !inside_quotes;
        } else if ch == delimiter && !inside_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    fields
}

/// Row parser bound to one detected schema.
#[derive(Debug, Clone)]
pub struct RowParser {
    delimiter: char,
    column_count: usize,
    overflow: OverflowPolicy,
}

impl RowParser {
    pub fn new(delimiter: char, column_count: usize, overflow: OverflowPolicy) -> Self {
        Self {
            delimiter,
            column_count,
            overflow,
        }
    }

    pub fn for_schema(schema: &Schema, overflow: OverflowPolicy) -> Self {
        Self::new(schema.delimiter, schema.column_count(), overflow)
    }

    /// Returns exactly `column_count` fields: short rows are padded with empty strings,
    /// long rows are truncated or rejected according to the overflow policy.
    pub fn parse(&self, line: &str, line_number: usize) -> Result<Vec<String>> {
        let mut fields = parse_row(line, self.delimiter);

        if fields.len() > self.column_count {
            match self.overflow {
                OverflowPolicy::Truncate => fields.truncate(self.column_count),
                OverflowPolicy::Reject => {
                    return Err(TriageError::MalformedRow {
                        line: line_number,
                        reason: format!(
                            "expected {} fields, found {}",
                            self.column_count,
                            fields.len()
                        ),
                    });
                }
            }
        }

        fields.resize(self.column_count, String::new());
        Ok(fields)
    }
}
