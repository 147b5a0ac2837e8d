//! Incremental SQL statement builder.
//!
//! A [`SqlBuilder`] holds one statement of a fixed [`StatementKind`] and a
//! [`PartRegistry`] of expressions. Calls that create parts return a
//! [`PartId`]; later calls refer to parts by ID and splice copies of them
//! into the statement.
//!
//! # Example
//!
//! ```rust
//! use sqlparts_core::ast::{Operator, StatementKind};
//! use sqlparts_core::builder::SqlBuilder;
//! use sqlparts_core::value::Value;
//!
//! let mut b = SqlBuilder::new(StatementKind::Select);
//! b.select_add_target("people", None).unwrap();
//! let age = b.add_id(None, "age").unwrap();
//! let thirty = b.add_expr_value(None, None, &Value::Int(30)).unwrap();
//! let cond = b.add_cond(None, Operator::Gt, age, Some(thirty), None).unwrap();
//! b.set_where(Some(cond)).unwrap();
//! b.select_add_field("name", None, None).unwrap();
//!
//! let stmt = b.get_statement().unwrap();
//! assert_eq!(stmt.to_string(), "SELECT name FROM people WHERE age > 30");
//! ```
//!
//! Every failing call returns an error, logs it at warning level and leaves
//! the builder as it was.

mod compound;
mod expr;
mod fields;
mod registry;
mod select;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, warn};

pub use registry::{Part, PartId, PartKind, PartRegistry};

use crate::ast::{Expr, SelectStatement, Statement, StatementKind, Table};
use crate::dialect::Dialect;
use crate::error::{BuilderError, Result};
use crate::value::ValueRenderers;

/// Builds one SQL statement through a sequence of calls.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    kind: StatementKind,
    statement: Option<Statement>,
    registry: PartRegistry,
    /// IDs of the FROM targets, parallel to `SelectFrom::targets`.
    target_ids: Vec<PartId>,
    /// IDs of the joins, parallel to `SelectFrom::joins`.
    join_ids: Vec<PartId>,
    renderers: ValueRenderers,
}

impl SqlBuilder {
    /// Creates a builder for an empty statement of `kind`.
    ///
    /// Compound statements start out as UNION.
    #[must_use]
    pub fn new(kind: StatementKind) -> Self {
        Self::with_renderers(kind, ValueRenderers::default())
    }

    /// Creates a builder using `renderers` to turn values into SQL text.
    #[must_use]
    pub fn with_renderers(kind: StatementKind, renderers: ValueRenderers) -> Self {
        Self {
            kind,
            statement: Some(Statement::new(kind)),
            registry: PartRegistry::new(),
            target_ids: Vec::new(),
            join_ids: Vec::new(),
            renderers,
        }
    }

    /// Returns the statement kind fixed at construction.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Returns the value renderers.
    #[must_use]
    pub const fn renderers(&self) -> &ValueRenderers {
        &self.renderers
    }

    /// Returns the value renderers for customisation.
    pub fn renderers_mut(&mut self) -> &mut ValueRenderers {
        &mut self.renderers
    }

    /// Returns the part registry.
    #[must_use]
    pub const fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    /// Returns the part under `id` if it has the expected kind.
    #[must_use]
    pub fn lookup(&self, id: PartId, kind: PartKind) -> Option<&Part> {
        self.registry.lookup(id, kind)
    }

    /// Returns true once the statement was taken out of the builder.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.statement.is_none()
    }

    /// Sets the table of an INSERT, UPDATE or DELETE statement.
    ///
    /// # Errors
    ///
    /// Fails for SELECT and compound statements.
    pub fn set_table(&mut self, name: &str) -> Result<()> {
        self.run("set_table", |b| {
            let kind = b.kind;
            let slot = match b.statement_mut()? {
                Statement::Insert(insert) => &mut insert.table,
                Statement::Update(update) => &mut update.table,
                Statement::Delete(delete) => &mut delete.table,
                Statement::Select(_) | Statement::Compound(_) => {
                    return Err(BuilderError::WrongStatementKind {
                        operation: "set_table",
                        kind,
                    });
                }
            };
            *slot = Some(Table::new(name));
            Ok(())
        })
    }

    /// Sets (or with `None`, clears) the WHERE condition of a SELECT,
    /// UPDATE or DELETE statement.
    ///
    /// # Errors
    ///
    /// Fails for INSERT and compound statements, or if `cond` does not
    /// name an expression.
    pub fn set_where(&mut self, cond: Option<PartId>) -> Result<()> {
        self.run("set_where", |b| {
            b.statement()?;
            let kind = b.kind;
            let cond = b.registry.use_expr(cond)?;
            let slot = match b.statement_mut()? {
                Statement::Select(select) => &mut select.where_clause,
                Statement::Update(update) => &mut update.where_clause,
                Statement::Delete(delete) => &mut delete.where_clause,
                Statement::Insert(_) | Statement::Compound(_) => {
                    return Err(BuilderError::WrongStatementKind {
                        operation: "set_where",
                        kind,
                    });
                }
            };
            *slot = cond;
            Ok(())
        })
    }

    /// Returns the statement built so far, or `None` once it was taken.
    #[must_use]
    pub const fn sql_statement(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }

    /// Returns a copy of the statement built so far; the builder stays
    /// usable.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Empty`] once the statement was taken.
    pub fn to_sql_statement(&self) -> Result<Statement> {
        let stmt = self.statement().cloned();
        if let Err(err) = &stmt {
            warn!(operation = "to_sql_statement", error = %err, "SQL builder operation failed");
        }
        stmt
    }

    /// Takes the statement out of the builder, without validating it.
    ///
    /// Every later call on this builder fails with [`BuilderError::Empty`].
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Empty`] if the statement was already taken.
    pub fn take_sql_statement(&mut self) -> Result<Statement> {
        self.run("take_sql_statement", |b| {
            let stmt = b.statement.take().ok_or(BuilderError::Empty)?;
            debug!(kind = %b.kind, "statement taken out of builder");
            Ok(stmt)
        })
    }

    /// Validates the statement and returns an immutable, shareable copy.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Empty`] once the statement was taken, or
    /// [`BuilderError::Structure`] if validation fails.
    pub fn get_statement(&self) -> Result<ValidatedStatement> {
        let result = self.statement().and_then(|stmt| {
            stmt.check_structure()?;
            Ok(ValidatedStatement(Arc::new(stmt.clone())))
        });
        match &result {
            Ok(_) => debug!(kind = %self.kind, "statement materialized"),
            Err(err) => {
                warn!(operation = "get_statement", error = %err, "SQL builder operation failed");
            }
        }
        result
    }

    /// Runs one public operation, logging its failure.
    fn run<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let result = f(self);
        if let Err(err) = &result {
            warn!(operation, kind = %self.kind, error = %err, "SQL builder operation failed");
        }
        result
    }

    fn statement(&self) -> Result<&Statement> {
        self.statement.as_ref().ok_or(BuilderError::Empty)
    }

    fn statement_mut(&mut self) -> Result<&mut Statement> {
        self.statement.as_mut().ok_or(BuilderError::Empty)
    }

    /// Fails unless the builder is live and holds a statement of `kind`.
    fn require(&self, operation: &'static str, kind: StatementKind) -> Result<()> {
        self.statement()?;
        if self.kind == kind {
            Ok(())
        } else {
            Err(BuilderError::WrongStatementKind {
                operation,
                kind: self.kind,
            })
        }
    }

    fn select_mut(&mut self, operation: &'static str) -> Result<&mut SelectStatement> {
        let kind = self.kind;
        match self.statement_mut()? {
            Statement::Select(select) => Ok(select),
            _ => Err(BuilderError::WrongStatementKind { operation, kind }),
        }
    }

    fn register_expr(&mut self, id: Option<PartId>, expr: Expr) -> Result<PartId> {
        self.registry.register(id, Part::Expr(expr))
    }
}

/// A validated statement, cheap to clone and safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedStatement(Arc<Statement>);

impl ValidatedStatement {
    /// Returns the statement.
    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.0
    }

    /// Renders the statement as SQL for `dialect`.
    #[must_use]
    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        crate::render::to_sql(&self.0, dialect)
    }
}

impl Deref for ValidatedStatement {
    type Target = Statement;

    fn deref(&self) -> &Statement {
        &self.0
    }
}

impl fmt::Display for ValidatedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}
