// file: src/parser/normalizer.rs
// description: raw upload normalization ahead of schema detection
// reference: https://www.rfc-editor.org/rfc/rfc4180

pub struct InputNormalizer;

impl InputNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Strips a UTF-8 byte-order mark and folds CRLF / CR line endings into LF.
    pub fn normalize(&self, content: &str) -> String {
        let content = self.strip_bom(content);
        self.normalize_line_endings(content)
    }

    fn strip_bom<'a>(&self, content: &'a str) -> &'a str {
        content.strip_prefix('\u{feff}').unwrap_or(content)
    }

    fn normalize_line_endings(&self, content: &str) -> String {
        content.replace("\r\n", "\n").replace('\r', "\n")
    }
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
