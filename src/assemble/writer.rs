//! Indent-aware string builder for feature files.
//!
//! Gherkin scenario bodies use 2-space indentation.

const INDENT: &str = "  ";

pub struct FeatureWriter {
    buf: String,
    indent_level: usize,
}

impl FeatureWriter {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(1024),
            indent_level: 0,
        }
    }

    /// Write a complete line (appends newline).
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write an empty line. Never indented.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write `keyword: title` at the current level.
    pub fn section(&mut self, keyword: &str, title: &str) {
        self.line(&format!("{}: {}", keyword, title));
    }

    /// Consume the writer and return the generated text.
    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for FeatureWriter {
    fn default() -> Self {
        Self::new()
    }
}
