//! Token types for the SQL tokenizer.

use super::{Flavour, Span};

/// SQL keywords recognized by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Queries
    Select,
    From,
    Where,
    Order,
    By,
    Group,
    Having,
    Limit,
    Offset,
    Distinct,
    All,
    As,
    Asc,
    Desc,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Natural,
    On,
    Using,

    // Compound statements
    Union,
    Intersect,
    Except,

    // Data manipulation
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Create,

    // Operators
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Ilike,
    Similar,
    To,
    Is,
    Null,

    // Expressions
    Case,
    When,
    Then,
    Else,
    End,
    Cast,

    // Blocks
    Declare,
    Loop,
    Delimiter,

    // Transactions
    Begin,
    Commit,
    Rollback,
    Savepoint,
    Release,
    Transaction,
    Isolation,
    Level,
    Read,
    Write,
    Only,
    Committed,
    Uncommitted,
    Repeatable,
    Serializable,
    Deferred,
    Immediate,
    Exclusive,
    Comment,

    // Oracle
    Batch,
    Force,
    Nowait,
    Wait,
}

impl Keyword {
    /// Looks up a keyword (case-insensitive) for the given flavour.
    ///
    /// The base table applies to every flavour; flavour-specific keywords
    /// are layered on top of it.
    #[must_use]
    pub fn lookup(text: &str, flavour: Flavour) -> Option<Self> {
        let upper = text.to_ascii_uppercase();
        Self::base(&upper).or_else(|| Self::flavour_specific(&upper, flavour))
    }

    fn base(upper: &str) -> Option<Self> {
        let keyword = match upper {
            "SELECT" => Self::Select,
            "FROM" => Self::From,
            "WHERE" => Self::Where,
            "ORDER" => Self::Order,
            "BY" => Self::By,
            "GROUP" => Self::Group,
            "HAVING" => Self::Having,
            "LIMIT" => Self::Limit,
            "OFFSET" => Self::Offset,
            "DISTINCT" => Self::Distinct,
            "ALL" => Self::All,
            "AS" => Self::As,
            "ASC" => Self::Asc,
            "DESC" => Self::Desc,
            "JOIN" => Self::Join,
            "INNER" => Self::Inner,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "FULL" => Self::Full,
            "OUTER" => Self::Outer,
            "CROSS" => Self::Cross,
            "NATURAL" => Self::Natural,
            "ON" => Self::On,
            "USING" => Self::Using,
            "UNION" => Self::Union,
            "INTERSECT" => Self::Intersect,
            "EXCEPT" => Self::Except,
            "INSERT" => Self::Insert,
            "INTO" => Self::Into,
            "VALUES" => Self::Values,
            "UPDATE" => Self::Update,
            "SET" => Self::Set,
            "DELETE" => Self::Delete,
            "CREATE" => Self::Create,
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "IN" => Self::In,
            "BETWEEN" => Self::Between,
            "LIKE" => Self::Like,
            "ILIKE" => Self::Ilike,
            "SIMILAR" => Self::Similar,
            "TO" => Self::To,
            "IS" => Self::Is,
            "NULL" => Self::Null,
            "CASE" => Self::Case,
            "WHEN" => Self::When,
            "THEN" => Self::Then,
            "ELSE" => Self::Else,
            "END" => Self::End,
            "CAST" => Self::Cast,
            "DECLARE" => Self::Declare,
            "LOOP" => Self::Loop,
            "DELIMITER" => Self::Delimiter,
            "BEGIN" | "START" => Self::Begin,
            "COMMIT" => Self::Commit,
            "ROLLBACK" => Self::Rollback,
            "SAVEPOINT" => Self::Savepoint,
            "RELEASE" => Self::Release,
            "TRANSACTION" | "WORK" => Self::Transaction,
            "ISOLATION" => Self::Isolation,
            "LEVEL" => Self::Level,
            "READ" => Self::Read,
            "WRITE" => Self::Write,
            "ONLY" => Self::Only,
            "COMMITTED" => Self::Committed,
            "UNCOMMITTED" => Self::Uncommitted,
            "REPEATABLE" => Self::Repeatable,
            "SERIALIZABLE" => Self::Serializable,
            "DEFERRED" => Self::Deferred,
            "IMMEDIATE" => Self::Immediate,
            "EXCLUSIVE" => Self::Exclusive,
            "COMMENT" => Self::Comment,
            _ => return None,
        };
        Some(keyword)
    }

    fn flavour_specific(upper: &str, flavour: Flavour) -> Option<Self> {
        match (flavour, upper) {
            (Flavour::Oracle, "BATCH") => Some(Self::Batch),
            (Flavour::Oracle, "FORCE") => Some(Self::Force),
            (Flavour::Oracle, "NOWAIT") => Some(Self::Nowait),
            (Flavour::Oracle, "WAIT") => Some(Self::Wait),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Group => "GROUP",
            Self::Having => "HAVING",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::As => "AS",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::Natural => "NATURAL",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Ilike => "ILIKE",
            Self::Similar => "SIMILAR",
            Self::To => "TO",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::Declare => "DECLARE",
            Self::Loop => "LOOP",
            Self::Delimiter => "DELIMITER",
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
            Self::Savepoint => "SAVEPOINT",
            Self::Release => "RELEASE",
            Self::Transaction => "TRANSACTION",
            Self::Isolation => "ISOLATION",
            Self::Level => "LEVEL",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Only => "ONLY",
            Self::Committed => "COMMITTED",
            Self::Uncommitted => "UNCOMMITTED",
            Self::Repeatable => "REPEATABLE",
            Self::Serializable => "SERIALIZABLE",
            Self::Deferred => "DEFERRED",
            Self::Immediate => "IMMEDIATE",
            Self::Exclusive => "EXCLUSIVE",
            Self::Comment => "COMMENT",
            Self::Batch => "BATCH",
            Self::Force => "FORCE",
            Self::Nowait => "NOWAIT",
            Self::Wait => "WAIT",
        }
    }
}

/// The attribute named inside a `/* name:... type:... */` parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSpecKey {
    /// `name:`
    Name,
    /// `type:`
    Type,
    /// `descr:`
    Description,
    /// `nullok:`
    NullOk,
}

impl ParamSpecKey {
    /// All keys with their source prefixes.
    pub const PREFIXES: [(&'static str, Self); 4] = [
        ("name:", Self::Name),
        ("type:", Self::Type),
        ("descr:", Self::Description),
        ("nullok:", Self::NullOk),
    ];
}

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal, decimal or `0x` hexadecimal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal (`'...'` or PostgreSQL `$tag$...$tag$`).
    String(String),
    /// Blob literal (`X'...'`).
    Blob(Vec<u8>),

    // Identifiers and keywords
    /// Identifier, bare or quoted.
    Identifier(String),
    /// Keyword.
    Keyword(Keyword),

    // Parameters
    /// Named or positional parameter: `##name::type`, `?1`, `$name`, `:name`, `@name`.
    Param(String),
    /// `##` with no name.
    UnspecifiedValue,
    /// Opening `/*` of a parameter specification block.
    ParamSpecOpen,
    /// One `key:value` attribute inside a parameter specification block.
    ParamSpecAttr(ParamSpecKey, String),
    /// Closing `*/` of a parameter specification block.
    ParamSpecClose,

    // Two-word keywords
    /// `IS NULL`
    IsNull,
    /// `NOT NULL`
    NotNull,
    /// `NOT LIKE`
    NotLike,
    /// `NOT ILIKE`
    NotIlike,
    /// `END LOOP`
    EndLoop,
    /// `SIMILAR TO`
    SimilarTo,

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// = or ==
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~ outside PostgreSQL
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// ~ in PostgreSQL
    Regexp,
    /// ~*
    RegexpCi,
    /// !~
    NotRegexp,
    /// !~*
    NotRegexpCi,
    /// ::
    PgCast,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// .
    Dot,

    // Layout
    /// Whitespace.
    Space,
    /// `--` comment, `#` comment (MySQL) or plain `/* */` comment.
    Comment,
    /// The statement delimiter, outside any block.
    Semicolon,
    /// Text the tokenizer passes through unparsed.
    RawString(String),
    /// Malformed input.
    Illegal(String),
    /// End of input.
    Eof,
}

/// A token with its kind and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The source span.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true for whitespace and comments.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Space | TokenKind::Comment)
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == keyword)
    }

    /// Returns the source text covered by this token.
    #[must_use]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.span.start..self.span.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_case_insensitive() {
        assert_eq!(
            Keyword::lookup("select", Flavour::Standard),
            Some(Keyword::Select)
        );
        assert_eq!(
            Keyword::lookup("SeLeCt", Flavour::Postgresql),
            Some(Keyword::Select)
        );
        assert_eq!(Keyword::lookup("people", Flavour::Standard), None);
    }

    #[test]
    fn test_keyword_synonyms() {
        assert_eq!(
            Keyword::lookup("start", Flavour::Standard),
            Some(Keyword::Begin)
        );
        assert_eq!(
            Keyword::lookup("work", Flavour::Standard),
            Some(Keyword::Transaction)
        );
    }

    #[test]
    fn test_oracle_only_keywords() {
        for word in ["batch", "force", "nowait", "wait"] {
            assert!(Keyword::lookup(word, Flavour::Oracle).is_some(), "{word}");
            assert!(Keyword::lookup(word, Flavour::Standard).is_none(), "{word}");
            assert!(Keyword::lookup(word, Flavour::Mysql).is_none(), "{word}");
        }
    }

    #[test]
    fn test_token_text() {
        let input = "SELECT x";
        let token = Token::new(TokenKind::Identifier(String::from("x")), Span::new(7, 8));
        assert_eq!(token.text(input), "x");
        assert!(!token.is_eof());
        assert!(!token.is_trivia());
    }
}
