//! Structural validation of statement trees.
//!
//! The builder accepts calls in any order, so a tree can be incomplete or
//! contradictory while it is being built. [`Statement::check_structure`]
//! runs once, when the statement is materialized.

use super::expression::{Expr, Operator};
use super::statement::{
    CompoundStatement, InsertSource, InsertStatement, JoinKind, Query, SelectStatement,
    Statement, Table,
};
use super::visit::{NodeRef, walk};

/// Why a statement tree is not well formed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// A required part is missing or parts have mismatched sizes.
    #[error("{0}")]
    Contents(String),
    /// Parts contradict each other.
    #[error("{0}")]
    Validation(String),
    /// A table, column or function name is not a valid identifier.
    #[error("'{0}' is not a valid identifier")]
    MalformedIdentifier(String),
}

impl StructureError {
    fn contents(message: impl Into<String>) -> Self {
        Self::Contents(message.into())
    }

    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Returns true if `name` can be used as an SQL identifier.
///
/// Accepts letters, digits, `_`, `$`, `*`, `.` and `-`, or anything wrapped
/// in double quotes or backticks. Plain numbers are rejected.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if first == '"' || first == '`' {
        return name.len() >= 2 && name.ends_with(first);
    }
    let well_formed = name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '*' | '.' | '-') || !c.is_ascii());
    let numeric = (first.is_ascii_digit() || first == '.') && name.parse::<f64>().is_ok();
    well_formed && !numeric
}

fn check_name(name: &str) -> Result<(), StructureError> {
    if name.is_empty() {
        return Err(StructureError::contents("Empty identifier"));
    }
    if is_identifier(name) {
        Ok(())
    } else {
        Err(StructureError::MalformedIdentifier(name.to_string()))
    }
}

fn check_table(table: Option<&Table>) -> Result<(), StructureError> {
    let table = table.ok_or_else(|| StructureError::contents("Missing table in statement"))?;
    check_name(&table.name)
}

fn query_width(query: &Query) -> Option<usize> {
    match query {
        Query::Select(select) => Some(select.fields.len()),
        Query::Compound(compound) => compound.statements.first().and_then(query_width),
    }
}

fn check_insert(insert: &InsertStatement) -> Result<(), StructureError> {
    let table = insert.table.as_ref().ok_or_else(|| {
        StructureError::contents("INSERT statement needs a table to insert into")
    })?;
    check_name(&table.name)?;
    for column in &insert.columns {
        check_name(&column.name)?;
    }
    match &insert.source {
        InsertSource::Query(query) => {
            if let Some(width) = query_width(query) {
                if !insert.columns.is_empty() && width != insert.columns.len() {
                    return Err(StructureError::contents(
                        "INSERT statement does not have the same number of target columns and expressions",
                    ));
                }
            }
        }
        InsertSource::Values(rows) => {
            if rows.is_empty() {
                if insert.columns.is_empty() {
                    return Err(StructureError::contents(
                        "Missing values to insert in INSERT statement",
                    ));
                }
                return Ok(());
            }
            let width = rows[0].len();
            if width == 0 {
                return Err(StructureError::contents(
                    "Missing values to insert in INSERT statement",
                ));
            }
            if rows.iter().any(|row| row.len() != width) {
                return Err(StructureError::contents(
                    "VALUES lists must all be the same length in INSERT statement",
                ));
            }
            if !insert.columns.is_empty() && width != insert.columns.len() {
                return Err(StructureError::contents(
                    "INSERT statement does not have the same number of target columns and expressions",
                ));
            }
        }
    }
    Ok(())
}

fn check_select(select: &SelectStatement) -> Result<(), StructureError> {
    if select.fields.is_empty() {
        return Err(StructureError::contents(
            "SELECT does not contain any expression",
        ));
    }
    if select.distinct_on.is_some() && !select.distinct {
        return Err(StructureError::validation(
            "SELECT can't have a DISTINCT expression if DISTINCT is not set",
        ));
    }
    if select.having.is_some() && select.group_by.is_empty() {
        return Err(StructureError::validation(
            "SELECT can't have a HAVING without GROUP BY",
        ));
    }
    if select.offset.is_some() && select.limit.is_none() {
        return Err(StructureError::validation(
            "SELECT can't have a limit offset without a limit",
        ));
    }
    let Some(from) = &select.from else {
        return Ok(());
    };
    if from.targets.is_empty() {
        return Err(StructureError::contents("Empty FROM clause"));
    }
    let mut names: Vec<&str> = Vec::new();
    for target in &from.targets {
        let name = target.alias.as_deref().or(target.table_name.as_deref());
        if let Some(name) = name {
            if names.contains(&name) {
                return Err(StructureError::Validation(format!(
                    "Multiple targets named or aliased '{name}'"
                )));
            }
            names.push(name);
        }
        if let (Expr::Identifier(_), Some(table)) = (&target.expr, &target.table_name) {
            check_name(table)?;
        }
    }
    for join in &from.joins {
        if join.position == 0 || join.position >= from.targets.len() {
            return Err(StructureError::Validation(format!(
                "Join refers to target position {} which has no preceding target",
                join.position
            )));
        }
        if join.condition.is_some() && !join.using.is_empty() {
            return Err(StructureError::validation(
                "Join can't at the same time specify a join condition and a list of fields to join on",
            ));
        }
        if join.kind == JoinKind::Cross
            && (join.condition.is_some() || !join.using.is_empty())
        {
            return Err(StructureError::validation(
                "Cross join can't have a join condition or a list of fields to join on",
            ));
        }
        for field in &join.using {
            check_name(&field.name)?;
        }
    }
    Ok(())
}

fn check_compound(compound: &CompoundStatement) -> Result<(), StructureError> {
    if compound.statements.len() < 2 {
        return Err(StructureError::contents(
            "COMPOUND statement contains less than two SELECT statements",
        ));
    }
    Ok(())
}

fn check_expr(expr: &Expr) -> Result<(), StructureError> {
    match expr {
        Expr::Operation(op) => {
            if op.operands.is_empty() {
                return Err(StructureError::contents("Operation has no operand"));
            }
            if !op.operator.arity().accepts(op.operands.len()) {
                return Err(StructureError::Contents(format!(
                    "Wrong number of operands for {}: {}",
                    op.operator.as_str(),
                    op.operands.len()
                )));
            }
            if matches!(op.operator, Operator::In | Operator::NotIn)
                && op.operands[0].is_sub_select()
            {
                return Err(StructureError::validation(
                    "IN operator can't have a sub-select as left operand",
                ));
            }
            Ok(())
        }
        Expr::Function(func) => check_name(&func.name),
        Expr::Case(case) => {
            if case.branches.is_empty() {
                return Err(StructureError::contents(
                    "CASE expression has no WHEN ... THEN pair",
                ));
            }
            Ok(())
        }
        Expr::Identifier(_) | Expr::Literal(_) | Expr::Param(_) | Expr::SubSelect(_) => Ok(()),
    }
}

impl Statement {
    /// Checks that every required part is present and that parts are
    /// consistent with each other, recursing into sub-selects.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found.
    pub fn check_structure(&self) -> Result<(), StructureError> {
        walk(self, &mut |node, _parent| -> Result<(), StructureError> {
            match node {
                NodeRef::Select(select) => check_select(select),
                NodeRef::Insert(insert) => check_insert(insert),
                NodeRef::Update(update) => {
                    check_table(update.table.as_ref())?;
                    if update.assignments.is_empty() {
                        return Err(StructureError::contents(
                            "UPDATE statement does not set any column",
                        ));
                    }
                    update
                        .assignments
                        .iter()
                        .try_for_each(|a| check_name(&a.field.name))
                }
                NodeRef::Delete(delete) => check_table(delete.table.as_ref()),
                NodeRef::Compound(compound) => check_compound(compound),
                NodeRef::Expr(expr) => check_expr(expr),
                NodeRef::Field(_) | NodeRef::Target(_) | NodeRef::Join(_) | NodeRef::Order(_) => {
                    Ok(())
                }
            }
        })
    }
}
