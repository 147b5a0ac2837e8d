//! Expression AST types.

use serde::{Deserialize, Serialize};

use super::statement::Query;
use crate::value::ValueKind;

/// Operators usable in a condition expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    // Logical
    And,
    Or,
    Not,

    // Comparison
    Eq,
    Is,
    Like,
    NotLike,
    Ilike,
    NotIlike,
    Between,
    Gt,
    Lt,
    Geq,
    Leq,
    Diff,
    Regexp,
    RegexpCi,
    NotRegexp,
    NotRegexpCi,
    Similar,
    IsNull,
    IsNotNull,
    In,
    NotIn,

    // Arithmetic
    Concat,
    Plus,
    Minus,
    Star,
    Div,
    Rem,

    // Bitwise
    BitAnd,
    BitOr,
    BitNot,
}

/// How many operands an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many operands.
    Exactly(usize),
    /// This many operands or more.
    AtLeast(usize),
}

impl Arity {
    /// Returns true if `count` operands satisfy this arity.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Self; 33] = [
        Self::And,
        Self::Or,
        Self::Not,
        Self::Eq,
        Self::Is,
        Self::Like,
        Self::NotLike,
        Self::Ilike,
        Self::NotIlike,
        Self::Between,
        Self::Gt,
        Self::Lt,
        Self::Geq,
        Self::Leq,
        Self::Diff,
        Self::Regexp,
        Self::RegexpCi,
        Self::NotRegexp,
        Self::NotRegexpCi,
        Self::Similar,
        Self::IsNull,
        Self::IsNotNull,
        Self::In,
        Self::NotIn,
        Self::Concat,
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Div,
        Self::Rem,
        Self::BitAnd,
        Self::BitOr,
        Self::BitNot,
    ];

    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Eq => "=",
            Self::Is => "IS",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Ilike => "ILIKE",
            Self::NotIlike => "NOT ILIKE",
            Self::Between => "BETWEEN",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Geq => ">=",
            Self::Leq => "<=",
            Self::Diff => "!=",
            Self::Regexp => "~",
            Self::RegexpCi => "~*",
            Self::NotRegexp => "!~",
            Self::NotRegexpCi => "!~*",
            Self::Similar => "SIMILAR TO",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Concat => "||",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitNot => "~",
        }
    }

    /// Returns the number of operands this operator takes.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        match self {
            Self::Between => Arity::Exactly(3),
            Self::Not | Self::IsNull | Self::IsNotNull | Self::BitNot => Arity::Exactly(1),
            Self::And | Self::Or | Self::In | Self::NotIn | Self::Concat | Self::Star => {
                Arity::AtLeast(2)
            }
            Self::Plus | Self::Minus => Arity::AtLeast(1),
            Self::Eq
            | Self::Is
            | Self::Like
            | Self::NotLike
            | Self::Ilike
            | Self::NotIlike
            | Self::Gt
            | Self::Lt
            | Self::Geq
            | Self::Leq
            | Self::Diff
            | Self::Regexp
            | Self::RegexpCi
            | Self::NotRegexp
            | Self::NotRegexpCi
            | Self::Similar
            | Self::Div
            | Self::Rem
            | Self::BitAnd
            | Self::BitOr => Arity::Exactly(2),
        }
    }

    /// Returns true for operators written after their single operand.
    #[must_use]
    pub const fn is_postfix(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

/// Description of a statement parameter (a placeholder filled at execution).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Expected value type.
    pub kind: ValueKind,
    /// Whether NULL is an acceptable value.
    pub nullable: bool,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    /// Creates a non-nullable parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            description: None,
        }
    }

    /// Sets the nullable flag.
    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An operator applied to an ordered list of operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The operator.
    pub operator: Operator,
    /// Operands, in order.
    pub operands: Vec<Expr>,
}

/// A function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name.
    pub name: String,
    /// Arguments, in order.
    pub args: Vec<Expr>,
}

/// One `WHEN ... THEN ...` pair of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenThen {
    /// The WHEN expression.
    pub when: Expr,
    /// The THEN expression.
    pub then: Expr,
}

/// A CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpr {
    /// Value tested against each WHEN (simple CASE form).
    pub base: Option<Box<Expr>>,
    /// WHEN/THEN pairs, in order.
    pub branches: Vec<WhenThen>,
    /// ELSE branch.
    pub else_expr: Option<Box<Expr>>,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A name (column, table, possibly dotted like `t.col`).
    Identifier(String),
    /// An already-rendered SQL literal (`'text'`, `12`, `NULL`, ...).
    Literal(String),
    /// A statement parameter.
    Param(ParamSpec),
    /// An operator applied to operands.
    Operation(Operation),
    /// A function call.
    Function(FunctionCall),
    /// A CASE expression.
    Case(CaseExpr),
    /// A nested SELECT or compound statement.
    SubSelect(Box<Query>),
}

impl Expr {
    /// Creates an identifier expression.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Creates a literal expression from rendered SQL text.
    #[must_use]
    pub fn literal(sql: impl Into<String>) -> Self {
        Self::Literal(sql.into())
    }

    /// The `NULL` literal.
    #[must_use]
    pub fn null() -> Self {
        Self::Literal("NULL".to_string())
    }

    /// Creates an operation expression.
    #[must_use]
    pub const fn operation(operator: Operator, operands: Vec<Self>) -> Self {
        Self::Operation(Operation { operator, operands })
    }

    /// Returns the text of an identifier or literal expression.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Identifier(s) | Self::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this is a nested SELECT or compound statement.
    #[must_use]
    pub const fn is_sub_select(&self) -> bool {
        matches!(self, Self::SubSelect(_))
    }

    /// Returns true if this is the `NULL` literal.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Literal(s) if s.eq_ignore_ascii_case("NULL"))
    }
}
