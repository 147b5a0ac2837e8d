//! Tokenizer configuration: SQL flavour, scanning mode and delimiter.

use serde::{Deserialize, Serialize};

/// The SQL dialect family the tokenizer recognizes.
///
/// The flavour gates flavour-specific keywords (e.g. Oracle's `NOWAIT`)
/// and literal forms (PostgreSQL dollar-quoting, SQLite `?N` parameters,
/// MySQL `#` comments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Flavour {
    /// Standard SQL.
    #[default]
    Standard,
    /// SQLite.
    Sqlite,
    /// MySQL.
    Mysql,
    /// Oracle.
    Oracle,
    /// PostgreSQL.
    Postgresql,
}

impl Flavour {
    /// Returns the flavour name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
            Self::Oracle => "oracle",
            Self::Postgresql => "postgresql",
        }
    }
}

/// How the tokenizer treats words it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LexMode {
    /// Full tokenization for a parser: unknown words are identifiers and
    /// whitespace is dropped from statement token lists.
    #[default]
    Parse,
    /// Statement boundary detection only: unknown words and most operators
    /// collapse into raw strings.
    Delimit,
}

/// Tokenizer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerConfig {
    /// The SQL flavour.
    pub flavour: Flavour,
    /// The scanning mode.
    pub mode: LexMode,
    /// The initial statement delimiter.
    pub delimiter: String,
}

impl LexerConfig {
    /// Creates the default configuration: standard flavour, parse mode, `;`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flavour: Flavour::Standard,
            mode: LexMode::Parse,
            delimiter: String::from(";"),
        }
    }

    /// Sets the flavour.
    #[must_use]
    pub const fn with_flavour(mut self, flavour: Flavour) -> Self {
        self.flavour = flavour;
        self
    }

    /// Sets the scanning mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: LexMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the initial delimiter. An empty delimiter is ignored.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        if !delimiter.is_empty() {
            self.delimiter = delimiter;
        }
        self
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LexerConfig::default();
        assert_eq!(config.flavour, Flavour::Standard);
        assert_eq!(config.mode, LexMode::Parse);
        assert_eq!(config.delimiter, ";");
    }

    #[test]
    fn test_empty_delimiter_ignored() {
        let config = LexerConfig::new().with_delimiter("");
        assert_eq!(config.delimiter, ";");
        let config = LexerConfig::new().with_delimiter("//");
        assert_eq!(config.delimiter, "//");
    }
}
