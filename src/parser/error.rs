//! The error type produced by the tokenizer and the parser.

use std::fmt;

use crate::lexer::Span;

/// A lexical or grammatical error in SQL text.
///
/// Both the tokenizer and the parser raise this type; callers don't need
/// to distinguish "bad token" from "bad grammar" since both mean the
/// input SQL is rejected outright.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Where in the source text the problem was found.
    pub span: Span,
}

impl SyntaxError {
    /// Creates a syntax error with an explicit message.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Builds an "expected X, found Y" message.
    #[must_use]
    pub fn unexpected(expected: impl fmt::Display, found: impl fmt::Display, span: Span) -> Self {
        Self::new(format!("expected {expected}, found {found}"), span)
    }

    /// Builds an "unexpected end of input" message.
    #[must_use]
    pub fn unexpected_eof(expected: impl fmt::Display, span: Span) -> Self {
        Self::new(format!("expected {expected}, found end of input"), span)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at position {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span() {
        let err = SyntaxError::new("bad thing", Span::new(3, 7));
        assert_eq!(err.to_string(), "bad thing at position 3..7");
    }
}
