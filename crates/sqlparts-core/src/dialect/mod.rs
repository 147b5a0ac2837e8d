//! SQL Dialect support.
//!
//! Different databases quote identifiers and spell parameters differently.
//! A [`Dialect`] captures those differences for the renderer, and names the
//! tokenizer [`Flavour`] whose keyword table decides which words are
//! reserved.

mod generic;
mod mysql;
mod postgres;
mod sqlite;

pub use generic::GenericDialect;
pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::ast::ParamSpec;
use crate::lexer::{Flavour, Keyword};

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the tokenizer flavour matching this dialect.
    fn flavour(&self) -> Flavour {
        Flavour::Standard
    }

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns true if `word` is a keyword of this dialect.
    fn is_reserved(&self, word: &str) -> bool {
        Keyword::lookup(word, self.flavour()).is_some()
    }

    /// Returns true if the single name `name` must be quoted.
    ///
    /// Names starting with a digit, holding characters other than letters,
    /// digits and `_`, mixing upper and lower case, or colliding with a
    /// keyword are quoted.
    fn needs_quotes(&self, name: &str) -> bool {
        let Some(first) = name.chars().next() else {
            return true;
        };
        if first.is_ascii_digit() {
            return true;
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return true;
        }
        let has_lower = name.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = name.chars().any(|c| c.is_ascii_uppercase());
        (has_lower && has_upper) || self.is_reserved(name)
    }

    /// Quotes a single name, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Renders a possibly dotted identifier, quoting the parts that need
    /// it. `*` and parts that are already quoted are kept as they are.
    fn render_identifier(&self, name: &str) -> String {
        if is_quoted(name) {
            return name.to_string();
        }
        name.split('.')
            .map(|part| {
                if part == "*" || is_quoted(part) || !self.needs_quotes(part) {
                    part.to_string()
                } else {
                    self.quote_identifier(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Renders a parameter placeholder.
    ///
    /// The default is the `##name::type` notation, with `::null` appended
    /// for nullable parameters.
    fn param_placeholder(&self, spec: &ParamSpec) -> String {
        let mut out = format!("##{}::{}", spec.name, spec.kind.as_str());
        if spec.nullable {
            out.push_str("::null");
        }
        out
    }
}

fn is_quoted(name: &str) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => (open == '"' || open == '`') && open == close,
        _ => false,
    }
}
