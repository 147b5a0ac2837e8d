//! Depth-first traversal of a statement tree.
//!
//! The tree owns its children and keeps no back-pointers; [`walk`] hands
//! every node to the callback together with its parent instead.

use super::expression::Expr;
use super::statement::{
    CompoundStatement, DeleteStatement, InsertSource, InsertStatement, OrderBy, Query,
    SelectField, SelectJoin, SelectStatement, SelectTarget, Statement, UpdateStatement,
};

/// A borrowed reference to any node of a statement tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// SELECT statement.
    Select(&'a SelectStatement),
    /// INSERT statement.
    Insert(&'a InsertStatement),
    /// UPDATE statement.
    Update(&'a UpdateStatement),
    /// DELETE statement.
    Delete(&'a DeleteStatement),
    /// Compound statement.
    Compound(&'a CompoundStatement),
    /// Projection entry.
    Field(&'a SelectField),
    /// FROM target.
    Target(&'a SelectTarget),
    /// Join.
    Join(&'a SelectJoin),
    /// ORDER BY entry.
    Order(&'a OrderBy),
    /// Expression.
    Expr(&'a Expr),
}

impl<'a> NodeRef<'a> {
    /// Returns the root node of a statement.
    #[must_use]
    pub const fn of_statement(stmt: &'a Statement) -> Self {
        match stmt {
            Statement::Select(s) => Self::Select(s),
            Statement::Insert(s) => Self::Insert(s),
            Statement::Update(s) => Self::Update(s),
            Statement::Delete(s) => Self::Delete(s),
            Statement::Compound(s) => Self::Compound(s),
        }
    }

    const fn of_query(query: &'a Query) -> Self {
        match query {
            Query::Select(s) => Self::Select(s),
            Query::Compound(s) => Self::Compound(s),
        }
    }

    /// Returns the short node name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Compound(_) => "compound",
            Self::Field(_) => "field",
            Self::Target(_) => "target",
            Self::Join(_) => "join",
            Self::Order(_) => "order",
            Self::Expr(_) => "expr",
        }
    }
}

/// Visits every node of `stmt` in depth-first pre-order.
///
/// The callback receives the node and its parent (`None` for the root).
/// Returning an error stops the walk and propagates it.
///
/// # Errors
///
/// Returns the first error produced by `visit`.
pub fn walk<'a, E>(
    stmt: &'a Statement,
    visit: &mut impl FnMut(NodeRef<'a>, Option<NodeRef<'a>>) -> Result<(), E>,
) -> Result<(), E> {
    walk_node(NodeRef::of_statement(stmt), None, visit)
}

fn walk_node<'a, E>(
    node: NodeRef<'a>,
    parent: Option<NodeRef<'a>>,
    visit: &mut impl FnMut(NodeRef<'a>, Option<NodeRef<'a>>) -> Result<(), E>,
) -> Result<(), E> {
    visit(node, parent)?;
    let mut children: Vec<NodeRef<'a>> = Vec::new();
    match node {
        NodeRef::Select(select) => {
            children.extend(select.distinct_on.iter().map(NodeRef::Expr));
            children.extend(select.fields.iter().map(NodeRef::Field));
            if let Some(from) = &select.from {
                children.extend(from.targets.iter().map(NodeRef::Target));
                children.extend(from.joins.iter().map(NodeRef::Join));
            }
            children.extend(select.where_clause.iter().map(NodeRef::Expr));
            children.extend(select.group_by.iter().map(NodeRef::Expr));
            children.extend(select.having.iter().map(NodeRef::Expr));
            children.extend(select.order_by.iter().map(NodeRef::Order));
            children.extend(select.limit.iter().map(NodeRef::Expr));
            children.extend(select.offset.iter().map(NodeRef::Expr));
        }
        NodeRef::Insert(insert) => match &insert.source {
            InsertSource::Values(rows) => {
                children.extend(rows.iter().flatten().map(NodeRef::Expr));
            }
            InsertSource::Query(query) => children.push(NodeRef::of_query(query)),
        },
        NodeRef::Update(update) => {
            children.extend(update.assignments.iter().map(|a| NodeRef::Expr(&a.value)));
            children.extend(update.where_clause.iter().map(NodeRef::Expr));
        }
        NodeRef::Delete(delete) => {
            children.extend(delete.where_clause.iter().map(NodeRef::Expr));
        }
        NodeRef::Compound(compound) => {
            children.extend(compound.statements.iter().map(NodeRef::of_query));
        }
        NodeRef::Field(field) => children.push(NodeRef::Expr(&field.expr)),
        NodeRef::Target(target) => children.push(NodeRef::Expr(&target.expr)),
        NodeRef::Join(join) => children.extend(join.condition.iter().map(NodeRef::Expr)),
        NodeRef::Order(order) => children.push(NodeRef::Expr(&order.expr)),
        NodeRef::Expr(expr) => match expr {
            Expr::Identifier(_) | Expr::Literal(_) | Expr::Param(_) => {}
            Expr::Operation(op) => children.extend(op.operands.iter().map(NodeRef::Expr)),
            Expr::Function(func) => children.extend(func.args.iter().map(NodeRef::Expr)),
            Expr::Case(case) => {
                children.extend(case.base.as_deref().map(NodeRef::Expr));
                for branch in &case.branches {
                    children.push(NodeRef::Expr(&branch.when));
                    children.push(NodeRef::Expr(&branch.then));
                }
                children.extend(case.else_expr.as_deref().map(NodeRef::Expr));
            }
            Expr::SubSelect(query) => children.push(NodeRef::of_query(query)),
        },
    }
    for child in children {
        walk_node(child, Some(node), visit)?;
    }
    Ok(())
}
