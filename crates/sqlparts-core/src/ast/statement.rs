//! SQL statement AST types.

use serde::{Deserialize, Serialize};

use super::expression::Expr;

/// The five statement kinds a builder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// SELECT.
    Select,
    /// INSERT.
    Insert,
    /// UPDATE.
    Update,
    /// DELETE.
    Delete,
    /// UNION / INTERSECT / EXCEPT of several selects.
    Compound,
}

impl StatementKind {
    /// Returns the SQL keyword naming this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Compound => "COMPOUND",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table name, possibly schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// The name as given.
    pub name: String,
}

impl Table {
    /// Creates a table reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A column name used by INSERT, UPDATE and JOIN ... USING.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// The name as given.
    pub name: String,
}

impl Field {
    /// Creates a field reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An entry of a SELECT's projection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectField {
    /// The projected expression.
    pub expr: Expr,
    /// Optional `AS` alias.
    pub alias: Option<String>,
}

impl SelectField {
    /// Table part of a dotted identifier (`t` in `t.col`).
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        match &self.expr {
            Expr::Identifier(name) => name.rsplit_once('.').map(|(table, _)| table),
            _ => None,
        }
    }

    /// Column part of an identifier (`col` in `t.col`).
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match &self.expr {
            Expr::Identifier(name) => Some(name.rsplit_once('.').map_or(name.as_str(), |(_, f)| f)),
            _ => None,
        }
    }
}

/// A source of rows in a SELECT's FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectTarget {
    /// The source expression (a table name or a sub-select).
    pub expr: Expr,
    /// Table name, when the source is a plain name.
    pub table_name: Option<String>,
    /// Optional alias.
    pub alias: Option<String>,
}

impl SelectTarget {
    /// Creates a target, deriving the table name from a plain-name source.
    #[must_use]
    pub fn new(expr: Expr, alias: Option<String>) -> Self {
        let table_name = expr.as_text().map(str::to_string);
        Self {
            expr,
            table_name,
            alias,
        }
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// CROSS JOIN (or a plain comma).
    Cross,
    /// NATURAL JOIN.
    Natural,
    /// INNER JOIN.
    Inner,
    /// LEFT JOIN.
    Left,
    /// RIGHT JOIN.
    Right,
    /// FULL JOIN.
    Full,
}

impl JoinKind {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cross => "CROSS JOIN",
            Self::Natural => "NATURAL JOIN",
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }

    /// The join type seen from the other side (LEFT and RIGHT swap).
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            other => other,
        }
    }
}

/// A join between the target at `position` and the targets before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectJoin {
    /// The type of join.
    pub kind: JoinKind,
    /// Index of the joined target in the FROM list.
    pub position: usize,
    /// `ON` condition.
    pub condition: Option<Expr>,
    /// `USING` columns.
    pub using: Vec<Field>,
}

/// The FROM clause of a SELECT.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectFrom {
    /// Targets, in order.
    pub targets: Vec<SelectTarget>,
    /// Joins between targets.
    pub joins: Vec<SelectJoin>,
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// Ascending (the default) or descending.
    pub ascending: bool,
    /// Optional `COLLATE` name.
    pub collation: Option<String>,
}

/// A SELECT statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    /// Whether DISTINCT is set.
    pub distinct: bool,
    /// `DISTINCT ON` expression.
    pub distinct_on: Option<Expr>,
    /// Projection list.
    pub fields: Vec<SelectField>,
    /// FROM clause.
    pub from: Option<SelectFrom>,
    /// WHERE condition.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING condition.
    pub having: Option<Expr>,
    /// ORDER BY entries.
    pub order_by: Vec<OrderBy>,
    /// LIMIT count.
    pub limit: Option<Expr>,
    /// OFFSET.
    pub offset: Option<Expr>,
}

/// Rows inserted by an INSERT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertSource {
    /// `VALUES (...), (...)`.
    Values(Vec<Vec<Expr>>),
    /// `INSERT ... SELECT`.
    Query(Box<Query>),
}

impl Default for InsertSource {
    fn default() -> Self {
        Self::Values(Vec::new())
    }
}

/// An INSERT statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    /// The table to insert into.
    pub table: Option<Table>,
    /// Target columns.
    pub columns: Vec<Field>,
    /// Rows to insert.
    pub source: InsertSource,
}

/// A `column = value` assignment in UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// The column.
    pub field: Field,
    /// The new value.
    pub value: Expr,
}

/// An UPDATE statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    /// The table to update.
    pub table: Option<Table>,
    /// SET assignments.
    pub assignments: Vec<Assignment>,
    /// WHERE condition.
    pub where_clause: Option<Expr>,
}

/// A DELETE statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    /// The table to delete from.
    pub table: Option<Table>,
    /// WHERE condition.
    pub where_clause: Option<Expr>,
}

/// How the members of a compound statement are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundKind {
    /// UNION.
    #[default]
    Union,
    /// UNION ALL.
    UnionAll,
    /// INTERSECT.
    Intersect,
    /// INTERSECT ALL.
    IntersectAll,
    /// EXCEPT.
    Except,
    /// EXCEPT ALL.
    ExceptAll,
}

impl CompoundKind {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::IntersectAll => "INTERSECT ALL",
            Self::Except => "EXCEPT",
            Self::ExceptAll => "EXCEPT ALL",
        }
    }
}

/// A UNION / INTERSECT / EXCEPT statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundStatement {
    /// The combining operator.
    pub kind: CompoundKind,
    /// Member statements, in order.
    pub statements: Vec<Query>,
}

/// A statement that yields rows: usable as a sub-select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// A SELECT.
    Select(SelectStatement),
    /// A compound statement.
    Compound(CompoundStatement),
}

impl From<Query> for Statement {
    fn from(query: Query) -> Self {
        match query {
            Query::Select(select) => Self::Select(select),
            Query::Compound(compound) => Self::Compound(compound),
        }
    }
}

/// A complete SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    /// SELECT statement.
    Select(SelectStatement),
    /// INSERT statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
    /// Compound statement.
    Compound(CompoundStatement),
}

impl Statement {
    /// Creates an empty statement of the given kind.
    #[must_use]
    pub fn new(kind: StatementKind) -> Self {
        match kind {
            StatementKind::Select => Self::Select(SelectStatement::default()),
            StatementKind::Insert => Self::Insert(InsertStatement::default()),
            StatementKind::Update => Self::Update(UpdateStatement::default()),
            StatementKind::Delete => Self::Delete(DeleteStatement::default()),
            StatementKind::Compound => Self::Compound(CompoundStatement::default()),
        }
    }

    /// Returns the kind of this statement.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        match self {
            Self::Select(_) => StatementKind::Select,
            Self::Insert(_) => StatementKind::Insert,
            Self::Update(_) => StatementKind::Update,
            Self::Delete(_) => StatementKind::Delete,
            Self::Compound(_) => StatementKind::Compound,
        }
    }

    /// Converts a SELECT or compound statement into a [`Query`].
    ///
    /// # Errors
    ///
    /// Gives the statement back unchanged if it is a DML statement.
    pub fn into_query(self) -> Result<Query, Self> {
        match self {
            Self::Select(select) => Ok(Query::Select(select)),
            Self::Compound(compound) => Ok(Query::Compound(compound)),
            other => Err(other),
        }
    }

    /// Serializes the statement tree as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
