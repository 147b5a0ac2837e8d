//! Tokenizer errors.

use super::{Position, Span};

/// A syntax error raised while splitting SQL text into statements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// A malformed token (unterminated quote, bad number suffix, ...).
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Illegal {
        /// Why the token was rejected.
        message: String,
        /// 1-based line of the token start.
        line: usize,
        /// 1-based column of the token start.
        column: usize,
        /// The offending token.
        span: Span,
    },
    /// The text contains no statement at all.
    #[error("SQL code does not contain any statement")]
    EmptySql,
}

impl SyntaxError {
    /// Builds an illegal-token error, computing its line and column.
    #[must_use]
    pub fn illegal(input: &str, span: Span, message: impl Into<String>) -> Self {
        let Position { line, column } = Position::at(input, span.start);
        Self::Illegal {
            message: message.into(),
            line,
            column,
            span,
        }
    }

    /// Returns the line/column of the error, if it has one.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Illegal { line, column, .. } => Some(Position {
                line: *line,
                column: *column,
            }),
            Self::EmptySql => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_display() {
        let err = SyntaxError::illegal("SELECT\n 'abc", Span::new(8, 12), "Unterminated string");
        assert_eq!(
            err.to_string(),
            "Syntax error at line 2, column 2: Unterminated string"
        );
        assert_eq!(err.position(), Some(Position { line: 2, column: 2 }));
    }

    #[test]
    fn test_empty_sql_has_no_position() {
        assert_eq!(SyntaxError::EmptySql.position(), None);
    }
}
