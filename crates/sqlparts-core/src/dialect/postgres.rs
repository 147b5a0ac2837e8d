//! PostgreSQL dialect.

use super::Dialect;
use crate::lexer::Flavour;

/// PostgreSQL dialect.
///
/// PostgreSQL folds unquoted names to lower case, so any upper-case letter
/// forces quoting.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Postgresql
    }

    fn needs_quotes(&self, name: &str) -> bool {
        let Some(first) = name.chars().next() else {
            return true;
        };
        first.is_ascii_digit()
            || !name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            || self.is_reserved(name)
    }
}
