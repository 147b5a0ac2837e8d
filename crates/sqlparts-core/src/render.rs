//! Rendering of statement trees back to SQL text.
//!
//! Literals are emitted as stored, identifiers go through
//! [`Dialect::render_identifier`] and parameters through
//! [`Dialect::param_placeholder`]. Nested operations are parenthesized.

use std::fmt;

use crate::ast::{
    CaseExpr, CompoundStatement, DeleteStatement, Expr, InsertSource, InsertStatement, OrderBy,
    Operation, Operator, Query, SelectFrom, SelectStatement, SelectTarget, Statement, Table,
    UpdateStatement,
};
use crate::dialect::{Dialect, GenericDialect};

/// Renders `stmt` as SQL for `dialect`.
#[must_use]
pub fn to_sql(stmt: &Statement, dialect: &dyn Dialect) -> String {
    match stmt {
        Statement::Select(select) => select_sql(select, dialect),
        Statement::Insert(insert) => insert_sql(insert, dialect),
        Statement::Update(update) => update_sql(update, dialect),
        Statement::Delete(delete) => delete_sql(delete, dialect),
        Statement::Compound(compound) => compound_sql(compound, dialect),
    }
}

/// Renders a single expression as SQL for `dialect`.
#[must_use]
pub fn expr_to_sql(expr: &Expr, dialect: &dyn Dialect) -> String {
    match expr {
        Expr::Identifier(name) => dialect.render_identifier(name),
        Expr::Literal(sql) => sql.clone(),
        Expr::Param(spec) => dialect.param_placeholder(spec),
        Expr::Operation(op) => operation_sql(op, dialect),
        Expr::Function(func) => {
            let args: Vec<String> = func.args.iter().map(|a| expr_to_sql(a, dialect)).collect();
            format!("{}({})", func.name, args.join(", "))
        }
        Expr::Case(case) => case_sql(case, dialect),
        Expr::SubSelect(query) => format!("({})", query_sql(query, dialect)),
    }
}

fn query_sql(query: &Query, dialect: &dyn Dialect) -> String {
    match query {
        Query::Select(select) => select_sql(select, dialect),
        Query::Compound(compound) => compound_sql(compound, dialect),
    }
}

/// Renders an operand, parenthesizing nested operations.
fn operand_sql(expr: &Expr, dialect: &dyn Dialect) -> String {
    match expr {
        Expr::Operation(_) => format!("({})", expr_to_sql(expr, dialect)),
        _ => expr_to_sql(expr, dialect),
    }
}

fn operation_sql(op: &Operation, dialect: &dyn Dialect) -> String {
    let operands: Vec<String> = op.operands.iter().map(|e| operand_sql(e, dialect)).collect();
    let symbol = op.operator.as_str();
    match (op.operator, operands.as_slice()) {
        (_, []) => String::new(),
        (Operator::Not, [x]) => format!("NOT {x}"),
        (Operator::BitNot | Operator::Minus | Operator::Plus, [x]) => format!("{symbol}{x}"),
        (operator, [x]) if operator.is_postfix() => format!("{x} {symbol}"),
        (Operator::Between, [x, low, high]) => format!("{x} BETWEEN {low} AND {high}"),
        (Operator::In | Operator::NotIn, [x, rest @ ..]) => {
            if let [Expr::SubSelect(_)] = &op.operands[1..] {
                format!("{x} {symbol} {}", rest.join(", "))
            } else {
                format!("{x} {symbol} ({})", rest.join(", "))
            }
        }
        _ => operands.join(&format!(" {symbol} ")),
    }
}

fn case_sql(case: &CaseExpr, dialect: &dyn Dialect) -> String {
    let mut sql = String::from("CASE");
    if let Some(base) = &case.base {
        sql.push(' ');
        sql.push_str(&expr_to_sql(base, dialect));
    }
    for branch in &case.branches {
        sql.push_str(" WHEN ");
        sql.push_str(&expr_to_sql(&branch.when, dialect));
        sql.push_str(" THEN ");
        sql.push_str(&expr_to_sql(&branch.then, dialect));
    }
    if let Some(else_expr) = &case.else_expr {
        sql.push_str(" ELSE ");
        sql.push_str(&expr_to_sql(else_expr, dialect));
    }
    sql.push_str(" END");
    sql
}

/// Renders an alias: quoted string literals are kept, names are quoted as
/// needed.
fn alias_sql(alias: &str, dialect: &dyn Dialect) -> String {
    if alias.starts_with('\'') {
        alias.to_string()
    } else {
        dialect.render_identifier(alias)
    }
}

fn target_sql(target: &SelectTarget, dialect: &dyn Dialect) -> String {
    let mut sql = expr_to_sql(&target.expr, dialect);
    if let Some(alias) = &target.alias {
        sql.push_str(" AS ");
        sql.push_str(&alias_sql(alias, dialect));
    }
    sql
}

fn from_sql(from: &SelectFrom, dialect: &dyn Dialect) -> String {
    let mut sql = String::new();
    for (position, target) in from.targets.iter().enumerate() {
        let join = from.joins.iter().find(|j| j.position == position);
        match join {
            Some(join) if position > 0 => {
                sql.push(' ');
                sql.push_str(join.kind.as_str());
                sql.push(' ');
                sql.push_str(&target_sql(target, dialect));
                if let Some(cond) = &join.condition {
                    sql.push_str(" ON ");
                    sql.push_str(&expr_to_sql(cond, dialect));
                }
                if !join.using.is_empty() {
                    let cols: Vec<String> = join
                        .using
                        .iter()
                        .map(|f| dialect.render_identifier(&f.name))
                        .collect();
                    sql.push_str(" USING (");
                    sql.push_str(&cols.join(", "));
                    sql.push(')');
                }
            }
            _ => {
                if position > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&target_sql(target, dialect));
            }
        }
    }
    sql
}

fn order_sql(order: &OrderBy, dialect: &dyn Dialect) -> String {
    let mut sql = expr_to_sql(&order.expr, dialect);
    if let Some(collation) = &order.collation {
        sql.push_str(" COLLATE ");
        sql.push_str(collation);
    }
    if !order.ascending {
        sql.push_str(" DESC");
    }
    sql
}

fn expr_list(exprs: &[Expr], dialect: &dyn Dialect) -> String {
    exprs
        .iter()
        .map(|e| expr_to_sql(e, dialect))
        .collect::<Vec<_>>()
        .join(", ")
}

fn select_sql(select: &SelectStatement, dialect: &dyn Dialect) -> String {
    let mut sql = String::from("SELECT");
    if select.distinct {
        sql.push_str(" DISTINCT");
        if let Some(on) = &select.distinct_on {
            sql.push_str(" ON (");
            sql.push_str(&expr_to_sql(on, dialect));
            sql.push(')');
        }
    }
    let fields: Vec<String> = select
        .fields
        .iter()
        .map(|field| {
            let mut out = expr_to_sql(&field.expr, dialect);
            if let Some(alias) = &field.alias {
                out.push_str(" AS ");
                out.push_str(&alias_sql(alias, dialect));
            }
            out
        })
        .collect();
    if !fields.is_empty() {
        sql.push(' ');
        sql.push_str(&fields.join(", "));
    }
    if let Some(from) = &select.from {
        sql.push_str(" FROM ");
        sql.push_str(&from_sql(from, dialect));
    }
    if let Some(cond) = &select.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&expr_to_sql(cond, dialect));
    }
    if !select.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&expr_list(&select.group_by, dialect));
    }
    if let Some(having) = &select.having {
        sql.push_str(" HAVING ");
        sql.push_str(&expr_to_sql(having, dialect));
    }
    if !select.order_by.is_empty() {
        let entries: Vec<String> = select
            .order_by
            .iter()
            .map(|o| order_sql(o, dialect))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&entries.join(", "));
    }
    if let Some(limit) = &select.limit {
        sql.push_str(" LIMIT ");
        sql.push_str(&expr_to_sql(limit, dialect));
    }
    if let Some(offset) = &select.offset {
        sql.push_str(" OFFSET ");
        sql.push_str(&expr_to_sql(offset, dialect));
    }
    sql
}

fn table_sql(table: Option<&Table>, dialect: &dyn Dialect) -> String {
    table.map_or_else(String::new, |t| dialect.render_identifier(&t.name))
}

fn insert_sql(insert: &InsertStatement, dialect: &dyn Dialect) -> String {
    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&table_sql(insert.table.as_ref(), dialect));
    if !insert.columns.is_empty() {
        let cols: Vec<String> = insert
            .columns
            .iter()
            .map(|c| dialect.render_identifier(&c.name))
            .collect();
        sql.push_str(" (");
        sql.push_str(&cols.join(", "));
        sql.push(')');
    }
    match &insert.source {
        InsertSource::Values(rows) => {
            let rows: Vec<String> = rows
                .iter()
                .map(|row| format!("({})", expr_list(row, dialect)))
                .collect();
            sql.push_str(" VALUES ");
            sql.push_str(&rows.join(", "));
        }
        InsertSource::Query(query) => {
            sql.push(' ');
            sql.push_str(&query_sql(query, dialect));
        }
    }
    sql
}

fn update_sql(update: &UpdateStatement, dialect: &dyn Dialect) -> String {
    let mut sql = String::from("UPDATE ");
    sql.push_str(&table_sql(update.table.as_ref(), dialect));
    let sets: Vec<String> = update
        .assignments
        .iter()
        .map(|a| {
            format!(
                "{} = {}",
                dialect.render_identifier(&a.field.name),
                expr_to_sql(&a.value, dialect)
            )
        })
        .collect();
    sql.push_str(" SET ");
    sql.push_str(&sets.join(", "));
    if let Some(cond) = &update.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&expr_to_sql(cond, dialect));
    }
    sql
}

fn delete_sql(delete: &DeleteStatement, dialect: &dyn Dialect) -> String {
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&table_sql(delete.table.as_ref(), dialect));
    if let Some(cond) = &delete.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&expr_to_sql(cond, dialect));
    }
    sql
}

fn compound_sql(compound: &CompoundStatement, dialect: &dyn Dialect) -> String {
    let members: Vec<String> = compound
        .statements
        .iter()
        .map(|member| match member {
            Query::Select(select) => select_sql(select, dialect),
            Query::Compound(inner) => format!("({})", compound_sql(inner, dialect)),
        })
        .collect();
    members.join(&format!(" {} ", compound.kind.as_str()))
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_sql(self, &GenericDialect::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionCall, ParamSpec, SelectField, WhenThen};
    use crate::dialect::{MysqlDialect, SqliteDialect};
    use crate::value::ValueKind;

    fn id(name: &str) -> Expr {
        Expr::identifier(name)
    }

    fn lit(sql: &str) -> Expr {
        Expr::literal(sql)
    }

    fn render(expr: &Expr) -> String {
        expr_to_sql(expr, &GenericDialect::new())
    }

    #[test]
    fn test_operator_forms() {
        assert_eq!(
            render(&Expr::operation(Operator::IsNotNull, vec![id("a")])),
            "a IS NOT NULL"
        );
        assert_eq!(
            render(&Expr::operation(Operator::Not, vec![id("a")])),
            "NOT a"
        );
        assert_eq!(
            render(&Expr::operation(Operator::Minus, vec![id("a")])),
            "-a"
        );
        assert_eq!(
            render(&Expr::operation(
                Operator::Between,
                vec![id("a"), lit("1"), lit("5")]
            )),
            "a BETWEEN 1 AND 5"
        );
        assert_eq!(
            render(&Expr::operation(
                Operator::In,
                vec![id("a"), lit("1"), lit("2")]
            )),
            "a IN (1, 2)"
        );
    }

    #[test]
    fn test_nested_operations_are_parenthesized() {
        let inner = Expr::operation(Operator::Or, vec![id("a"), id("b")]);
        let outer = Expr::operation(Operator::And, vec![inner, id("c")]);
        assert_eq!(render(&outer), "(a OR b) AND c");
    }

    #[test]
    fn test_in_sub_select() {
        let sub = Expr::SubSelect(Box::new(Query::Select(SelectStatement {
            fields: vec![SelectField {
                expr: id("id"),
                alias: None,
            }],
            ..SelectStatement::default()
        })));
        let expr = Expr::operation(Operator::NotIn, vec![id("a"), sub]);
        assert_eq!(render(&expr), "a NOT IN (SELECT id)");
    }

    #[test]
    fn test_function_and_case() {
        let f = Expr::Function(FunctionCall {
            name: "coalesce".into(),
            args: vec![id("a"), lit("0")],
        });
        assert_eq!(render(&f), "coalesce(a, 0)");
        let case = Expr::Case(CaseExpr {
            base: None,
            branches: vec![WhenThen {
                when: Expr::operation(Operator::Gt, vec![id("a"), lit("0")]),
                then: lit("'pos'"),
            }],
            else_expr: Some(Box::new(lit("'neg'"))),
        });
        assert_eq!(render(&case), "CASE WHEN a > 0 THEN 'pos' ELSE 'neg' END");
    }

    #[test]
    fn test_params_per_dialect() {
        let p = Expr::Param(ParamSpec::new("name", ValueKind::Text).nullable(true));
        assert_eq!(render(&p), "##name::string::null");
        assert_eq!(expr_to_sql(&p, &SqliteDialect::new()), ":name");
    }

    #[test]
    fn test_identifier_quoting_per_dialect() {
        let e = id("order.Total");
        assert_eq!(render(&e), "\"order\".\"Total\"");
        assert_eq!(expr_to_sql(&e, &MysqlDialect::new()), "`order`.`Total`");
    }
}
