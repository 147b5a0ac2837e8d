//! SQLite dialect.

use super::Dialect;
use crate::ast::ParamSpec;
use crate::lexer::Flavour;

/// SQLite dialect.
///
/// Parameters render as `:name`, one of the named forms SQLite binds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Sqlite
    }

    fn param_placeholder(&self, spec: &ParamSpec) -> String {
        format!(":{}", spec.name)
    }
}
