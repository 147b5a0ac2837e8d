//! Statement-level helpers on top of the lexer.

use super::{LexMode, Lexer, LexerConfig, SyntaxError, Token};

/// Tokenizes the first statement of `input`.
///
/// # Errors
///
/// Returns [`SyntaxError::EmptySql`] if the input holds no statement, or
/// [`SyntaxError::Illegal`] for the first malformed token.
pub fn tokenize_statement(input: &str, config: &LexerConfig) -> Result<Vec<Token>, SyntaxError> {
    Lexer::with_config(input, config)
        .next_statement()
        .unwrap_or(Err(SyntaxError::EmptySql))
}

/// Splits a batch of SQL text into statements.
///
/// Scans in delimit mode regardless of `config.mode`, so procedural blocks
/// keep their inner delimiters. Each returned slice runs from the first to
/// the last significant token of a statement; delimiters are not included.
///
/// # Errors
///
/// Returns [`SyntaxError::Illegal`] for the first malformed token.
pub fn split_statements<'a>(
    input: &'a str,
    config: &LexerConfig,
) -> Result<Vec<&'a str>, SyntaxError> {
    let config = config.clone().with_mode(LexMode::Delimit);
    let mut lexer = Lexer::with_config(input, &config);
    let mut statements = Vec::new();
    while let Some(tokens) = lexer.next_statement() {
        let tokens = tokens?;
        if let (Some(first), Some(last)) = (tokens.first(), tokens.last()) {
            statements.push(&input[first.span.start..last.span.end]);
        }
    }
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Flavour, TokenKind};

    #[test]
    fn test_tokenize_statement_stops_at_delimiter() {
        let tokens = tokenize_statement("SELECT a FROM t; SELECT b", &LexerConfig::default())
            .expect("statement");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].kind, TokenKind::Identifier(String::from("t")));
    }

    #[test]
    fn test_tokenize_statement_empty() {
        assert_eq!(
            tokenize_statement("  -- nothing\n ;; ", &LexerConfig::default()),
            Err(SyntaxError::EmptySql)
        );
    }

    #[test]
    fn test_tokenize_statement_reports_position() {
        let err = tokenize_statement("SELECT\n  'oops", &LexerConfig::default())
            .expect_err("unterminated string");
        assert!(matches!(
            err,
            SyntaxError::Illegal {
                line: 2,
                column: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_split_simple_batch() {
        let parts = split_statements("SELECT 1; SELECT 2 ;\n\n", &LexerConfig::default())
            .expect("split");
        assert_eq!(parts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_split_keeps_procedure_body() {
        let sql = "CREATE PROCEDURE p() BEGIN UPDATE t SET a = 1; DELETE FROM u; END; SELECT 1";
        let parts = split_statements(sql, &LexerConfig::default()).expect("split");
        assert_eq!(parts.len(), 2);
        assert!(parts[0].ends_with("END"));
        assert_eq!(parts[1], "SELECT 1");
    }

    #[test]
    fn test_split_mysql_delimiter() {
        let sql = "DELIMITER //\nCREATE PROCEDURE p() SELECT 1; //\nDELIMITER ;\nSELECT 2;";
        let config = LexerConfig::new().with_flavour(Flavour::Mysql);
        let parts = split_statements(sql, &config).expect("split");
        assert_eq!(
            parts,
            vec![
                "DELIMITER",
                "CREATE PROCEDURE p() SELECT 1;",
                "DELIMITER",
                "SELECT 2"
            ]
        );
    }

    #[test]
    fn test_split_oracle_routine() {
        let sql = "CREATE OR REPLACE PROCEDURE p IS BEGIN NULL; END; SELECT 1 FROM dual";
        let config = LexerConfig::new().with_flavour(Flavour::Oracle);
        let parts = split_statements(sql, &config).expect("split");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], "SELECT 1 FROM dual");
    }
}
