/// Limits applied while parsing untrusted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum document size in bytes.
    pub text_size_limit: usize,
    /// Maximum nesting of selection sets, list types, and list literals.
    pub depth_limit: usize,
}

impl ParserConfig {
    pub fn new() -> ParserConfig {
        ParserConfig::default()
    }

    pub fn with_text_size_limit(mut self, limit: usize) -> ParserConfig {
        self.text_size_limit = limit;
        self
    }

    pub fn with_depth_limit(mut self, limit: usize) -> ParserConfig {
        self.depth_limit = limit;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            text_size_limit: 1024 * 1024,
            depth_limit: 64,
        }
    }
}
