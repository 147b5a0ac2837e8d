//! MySQL dialect.

use super::Dialect;
use crate::lexer::Flavour;

/// MySQL dialect, quoting names with backticks.
#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Mysql
    }

    fn identifier_quote(&self) -> char {
        '`'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_dialect() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.name(), "mysql");
        assert_eq!(dialect.identifier_quote(), '`');
        assert_eq!(dialect.render_identifier("group"), "`group`");
        assert_eq!(dialect.quote_identifier("a`b"), "`a``b`");
    }
}
