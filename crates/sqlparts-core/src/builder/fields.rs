//! Field operations: INSERT columns and values, UPDATE assignments and
//! SELECT projections.

use super::expr::qualified_name;
use super::{PartId, SqlBuilder};
use crate::ast::{
    Assignment, Expr, Field, InsertSource, InsertStatement, SelectField, Statement,
};
use crate::error::{BuilderError, Result};
use crate::value::{ToSqlValue, Value, ValueKind};

impl SqlBuilder {
    /// Adds a field, with an optional value, to the statement.
    ///
    /// - UPDATE: appends the assignment `field = value`; a value is required.
    /// - INSERT: a sub-select field becomes the row source of the
    ///   statement. Otherwise the field joins the column list and its value
    ///   goes into the current VALUES row; the first column starts a new
    ///   row.
    /// - SELECT: appends `field` to the projection, aliased by `value`.
    ///
    /// # Errors
    ///
    /// Fails for DELETE and compound statements, for unknown IDs, for
    /// field expressions that are not plain names, and for INSERT calls
    /// that would mix a VALUES list with a sub-select. For SELECT, a
    /// `value` that is not an identifier or literal is rejected with
    /// [`BuilderError::WrongFieldFormat`] rather than dropped as an alias.
    pub fn add_field_id(&mut self, field: PartId, value: Option<PartId>) -> Result<()> {
        self.run("add_field_id", |b| {
            b.statement()?;
            let field = b.registry.expr(field)?.clone();
            let value = b.registry.use_expr(value)?;
            b.attach_field(field, value)
        })
    }

    /// Adds field `name` with `value` rendered by the builder's renderers.
    ///
    /// # Errors
    ///
    /// Fails like [`SqlBuilder::add_field_id`], or if the value cannot be
    /// rendered.
    pub fn add_field_value(&mut self, name: &str, value: &Value) -> Result<()> {
        self.run("add_field_value", |b| {
            b.statement()?;
            let value = b.value_expr(None, value)?;
            b.attach_field(Expr::identifier(name), Some(value))
        })
    }

    /// Converts `value` to `kind`, then behaves like
    /// [`SqlBuilder::add_field_value`].
    ///
    /// # Errors
    ///
    /// Fails if the conversion fails, or like
    /// [`SqlBuilder::add_field_value`].
    pub fn add_field(&mut self, name: &str, kind: ValueKind, value: impl ToSqlValue) -> Result<()> {
        match value.to_sql_value().coerce(kind) {
            Ok(value) => self.add_field_value(name, &value),
            Err(err) => self.run("add_field", |_| Err(err.into())),
        }
    }

    /// Adds `table.field` to a SELECT projection and returns the ID of the
    /// registered field identifier.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements.
    pub fn select_add_field(
        &mut self,
        field: &str,
        table: Option<&str>,
        alias: Option<&str>,
    ) -> Result<PartId> {
        let name = qualified_name(field, table);
        self.run("select_add_field", |b| {
            b.select_mut("select_add_field")?;
            let expr = Expr::Identifier(name);
            let id = b.register_expr(None, expr.clone())?;
            b.select_mut("select_add_field")?.fields.push(SelectField {
                expr,
                alias: alias.map(str::to_string),
            });
            Ok(id)
        })
    }

    /// Splices an already resolved field and value into the statement.
    fn attach_field(&mut self, field: Expr, value: Option<Expr>) -> Result<()> {
        let kind = self.kind;
        match self.statement_mut()? {
            Statement::Update(update) => {
                let name = field_name(&field)?;
                let value = value.ok_or(BuilderError::MissingOperand("value to assign"))?;
                update.assignments.push(Assignment {
                    field: Field::new(name),
                    value,
                });
                Ok(())
            }
            Statement::Insert(insert) => insert_field(insert, field, value),
            Statement::Select(select) => {
                let alias = value
                    .map(|v| field_name(&v).map(str::to_string))
                    .transpose()?;
                select.fields.push(SelectField { expr: field, alias });
                Ok(())
            }
            Statement::Delete(_) | Statement::Compound(_) => {
                Err(BuilderError::WrongStatementKind {
                    operation: "add_field_id",
                    kind,
                })
            }
        }
    }
}

/// Returns the name held by an identifier or literal expression.
fn field_name(expr: &Expr) -> Result<&str> {
    expr.as_text()
        .ok_or_else(|| BuilderError::WrongFieldFormat(format!("{expr:?} is not a name")))
}

fn insert_field(insert: &mut InsertStatement, field: Expr, value: Option<Expr>) -> Result<()> {
    if let Expr::SubSelect(query) = field {
        let no_rows = matches!(&insert.source, InsertSource::Values(rows) if rows.is_empty());
        if !no_rows {
            return Err(BuilderError::InsertSourceConflict);
        }
        insert.source = InsertSource::Query(query);
        return Ok(());
    }
    let name = field_name(&field)?;
    let rows = match &mut insert.source {
        InsertSource::Values(rows) => rows,
        InsertSource::Query(_) if value.is_some() => {
            return Err(BuilderError::InsertSourceConflict);
        }
        InsertSource::Query(_) => {
            push_column(&mut insert.columns, name);
            return Ok(());
        }
    };
    let index = push_column(&mut insert.columns, name);
    if let Some(value) = value {
        let needs_row = match rows.last() {
            None => true,
            Some(last) => index == 0 && !last.is_empty(),
        };
        if needs_row {
            rows.push(Vec::new());
        }
        if let Some(last) = rows.last_mut() {
            last.push(value);
        }
    }
    Ok(())
}

/// Returns the index of column `name`, appending it first if it is new.
fn push_column(columns: &mut Vec<Field>, name: &str) -> usize {
    if let Some(index) = columns.iter().position(|c| c.name == name) {
        return index;
    }
    columns.push(Field::new(name));
    columns.len() - 1
}
