//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! A [`Statement`] owns its whole tree. Nodes are plain values: cloning a
//! node deep-copies it, so a subtree can be spliced into several parents
//! without aliasing.

mod expression;
mod statement;
pub mod validate;
pub mod visit;

pub use expression::{
    Arity, CaseExpr, Expr, FunctionCall, Operation, Operator, ParamSpec, WhenThen,
};
pub use statement::{
    Assignment, CompoundKind, CompoundStatement, DeleteStatement, Field, InsertSource,
    InsertStatement, JoinKind, OrderBy, Query, SelectField, SelectFrom, SelectJoin,
    SelectStatement, SelectTarget, Statement, StatementKind, Table, UpdateStatement,
};
pub use validate::StructureError;
