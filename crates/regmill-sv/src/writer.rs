//! Line sink for rendered statements
//!
//! Emission never performs I/O itself: statements flow through a
//! [`StatementWriter`] and the driver decides where the text ends up.
//! [`StringWriter`] is the in-memory sink used by the generation
//! pipeline, which writes the finished module text to disk in one go.

/// Indentation-aware sink for generated statements
pub trait StatementWriter {
    /// Write one statement at the given indent level
    ///
    /// An empty `stmt` is a blank separator line and carries no
    /// indentation whitespace.
    fn write_stmt(&mut self, indent: usize, stmt: &str);
}

const INDENT_UNIT: &str = "    ";

/// Statement sink that accumulates indented text in memory
#[derive(Debug, Clone, Default)]
pub struct StringWriter {
    output: String,
}

impl StringWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// View the accumulated text
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Consume the writer, returning the accumulated text
    pub fn into_string(self) -> String {
        self.output
    }

    /// Check whether anything has been written
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }
}

impl StatementWriter for StringWriter {
    fn write_stmt(&mut self, indent: usize, stmt: &str) {
        if !stmt.is_empty() {
            self.output.push_str(&INDENT_UNIT.repeat(indent));
            self.output.push_str(stmt);
        }
        self.output.push('\n');
    }
}
