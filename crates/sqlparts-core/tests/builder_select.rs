//! Tests for SELECT statements built through the builder: targets, joins,
//! projections, filtering, grouping, ordering and paging.

mod common;
use common::*;

use sqlparts_core::ast::{Expr, JoinKind, Operator, StatementKind};
use sqlparts_core::dialect::PostgresDialect;
use sqlparts_core::value::Value;
use sqlparts_core::BuilderError;

#[test]
fn select_with_where() {
    let mut b = builder(StatementKind::Select);
    b.select_add_target("people", None).unwrap();
    let age = b.add_id(None, "age").unwrap();
    let thirty = b.add_expr_value(None, None, &Value::Int(30)).unwrap();
    let cond = b
        .add_cond(None, Operator::Gt, age, Some(thirty), None)
        .unwrap();
    b.set_where(Some(cond)).unwrap();
    b.select_add_field("name", None, None).unwrap();

    let select = select_of(&b);
    let from = select.from.as_ref().unwrap();
    assert_eq!(from.targets.len(), 1);
    assert_eq!(from.targets[0].table_name.as_deref(), Some("people"));
    assert_eq!(
        select.where_clause,
        Some(Expr::operation(
            Operator::Gt,
            vec![Expr::identifier("age"), Expr::literal("30")]
        ))
    );
    assert_eq!(select.fields.len(), 1);
    assert_eq!(select.fields[0].expr, Expr::identifier("name"));
    assert_eq!(sql(&b), "SELECT name FROM people WHERE age > 30");
}

#[test]
fn select_qualified_fields_and_aliases() {
    let mut b = builder(StatementKind::Select);
    b.select_add_target("people", Some("p")).unwrap();
    b.select_add_field("name", Some("p"), Some("who")).unwrap();
    b.select_add_field("*", Some("p"), None).unwrap();
    assert_eq!(sql(&b), "SELECT p.name AS who, p.* FROM people AS p");
}

#[test]
fn select_field_alias_from_add_field_id() {
    let mut b = builder(StatementKind::Select);
    b.select_add_target("people", None).unwrap();
    let field = b.add_id(None, "name").unwrap();
    let alias = b.add_id(None, "label").unwrap();
    b.add_field_id(field, Some(alias)).unwrap();
    assert_eq!(sql(&b), "SELECT name AS label FROM people");

    let bad = b.add_function(None, "upper", &[field]).unwrap();
    assert!(matches!(
        b.add_field_id(field, Some(bad)),
        Err(BuilderError::WrongFieldFormat(_))
    ));
}

#[test]
fn select_inner_join_with_condition() {
    let mut b = builder(StatementKind::Select);
    let people = b.select_add_target("people", Some("p")).unwrap();
    let orders = b.select_add_target("orders", Some("o")).unwrap();
    let left = b.add_qualified_id(None, "id", Some("p")).unwrap();
    let right = b.add_qualified_id(None, "person_id", Some("o")).unwrap();
    let on = b
        .add_cond(None, Operator::Eq, left, Some(right), None)
        .unwrap();
    b.select_join_targets(None, people, orders, JoinKind::Inner, Some(on))
        .unwrap();
    b.select_add_field("name", Some("p"), None).unwrap();
    b.select_add_field("total", Some("o"), None).unwrap();

    assert_eq!(
        sql(&b),
        "SELECT p.name, o.total FROM people AS p INNER JOIN orders AS o ON p.id = o.person_id"
    );
}

#[test]
fn select_join_records_later_position_and_mirrors() {
    let mut b = builder(StatementKind::Select);
    let a = b.select_add_target("a", None).unwrap();
    let c = b.select_add_target("c", None).unwrap();
    b.select_join_targets(None, c, a, JoinKind::Left, None)
        .unwrap();
    let from = select_of(&b).from.unwrap();
    let join = &from.joins[0];
    assert_eq!(join.position, 1);
    assert_eq!(join.kind, JoinKind::Right);

    assert_eq!(
        b.select_join_targets(None, a, a, JoinKind::Inner, None),
        Err(BuilderError::SelfJoin(a))
    );
}

#[test]
fn select_join_using_fields() {
    let mut b = builder(StatementKind::Select);
    let a = b.select_add_target("a", None).unwrap();
    let c = b.select_add_target("c", None).unwrap();
    let join = b
        .select_join_targets(None, a, c, JoinKind::Left, None)
        .unwrap();
    b.join_add_field(join, "id").unwrap();
    b.join_add_field(join, "region").unwrap();
    b.select_add_field("*", None, None).unwrap();
    assert_eq!(sql(&b), "SELECT * FROM a LEFT JOIN c USING (id, region)");
}

#[test]
fn select_join_add_field_unknown_join() {
    let mut b = builder(StatementKind::Select);
    let a = b.select_add_target("a", None).unwrap();
    assert_eq!(
        b.join_add_field(a, "id"),
        Err(BuilderError::UnknownJoin(a))
    );
}

#[test]
fn select_group_having_order_limit() {
    let mut b = builder(StatementKind::Select);
    b.select_add_target("orders", None).unwrap();
    let customer = b.select_add_field("customer", None, None).unwrap();
    let total = b.add_id(None, "total").unwrap();
    let sum = b.add_function(None, "sum", &[total]).unwrap();
    let floor = b.add_expr_value(None, None, &Value::Int(100)).unwrap();
    let having = b
        .add_cond(None, Operator::Gt, sum, Some(floor), None)
        .unwrap();
    b.select_group_by(Some(customer)).unwrap();
    b.select_set_having(Some(having)).unwrap();
    b.select_order_by(sum, false, None).unwrap();
    b.select_order_by(customer, true, Some("nocase")).unwrap();
    let ten = b.add_expr_value(None, None, &Value::Int(10)).unwrap();
    let five = b.add_expr_value(None, None, &Value::Int(5)).unwrap();
    b.select_set_limit(Some(ten), Some(five)).unwrap();

    assert_eq!(
        sql(&b),
        "SELECT customer FROM orders GROUP BY customer HAVING sum(total) > 100 \
         ORDER BY sum(total) DESC, customer COLLATE nocase LIMIT 10 OFFSET 5"
    );
}

#[test]
fn select_group_by_none_clears() {
    let mut b = simple_select("a", "t");
    let a = b.add_id(None, "a").unwrap();
    b.select_group_by(Some(a)).unwrap();
    b.select_group_by(None).unwrap();
    assert!(select_of(&b).group_by.is_empty());
}

#[test]
fn select_distinct_on() {
    let mut b = simple_select("name", "people");
    let on = b.add_id(None, "city").unwrap();
    b.select_set_distinct(true, Some(on)).unwrap();
    assert_eq!(sql(&b), "SELECT DISTINCT ON (city) name FROM people");
}

#[test]
fn select_structural_errors() {
    let mut b = simple_select("name", "people");
    let cond = b.add_id(None, "x").unwrap();
    b.select_set_having(Some(cond)).unwrap();
    let err = b.get_statement().unwrap_err();
    assert_eq!(
        err.to_string(),
        "SELECT can't have a HAVING without GROUP BY"
    );

    let mut b = builder(StatementKind::Select);
    b.select_add_target("people", None).unwrap();
    let err = b.get_statement().unwrap_err();
    assert_eq!(err.to_string(), "SELECT does not contain any expression");
}

#[test]
fn select_repeated_target_reuses_id() {
    let mut b = builder(StatementKind::Select);
    let first = b.select_add_target("people", None).unwrap();
    let again = b.select_add_target("people", None).unwrap();
    assert_eq!(first, again);
    let aliased = b.select_add_target("people", Some("p")).unwrap();
    assert_ne!(first, aliased);
    b.select_add_field("name", None, None).unwrap();
    assert_eq!(select_of(&b).from.unwrap().targets.len(), 2);
    assert_eq!(sql(&b), "SELECT name FROM people, people AS p");
}

#[test]
fn select_targets_sharing_an_alias_fail_validation() {
    let mut b = simple_select("a", "t");
    b.select_add_target("u", Some("t")).unwrap();
    let err = b.get_statement().unwrap_err();
    assert!(matches!(err, BuilderError::Structure(_)));
    assert_eq!(err.to_string(), "Multiple targets named or aliased 't'");
}

#[test]
fn select_sub_select_target() {
    let mut inner = simple_select("id", "people");
    let mut b = builder(StatementKind::Select);
    let sub = b
        .add_sub_select_from_builder(None, &mut inner, true)
        .unwrap();
    b.select_add_target_id(None, sub, Some("ids")).unwrap();
    b.select_add_field("id", Some("ids"), None).unwrap();
    assert_eq!(sql(&b), "SELECT ids.id FROM (SELECT id FROM people) AS ids");
    assert!(inner.is_exhausted());
}

#[test]
fn select_renders_for_postgres() {
    let mut b = builder(StatementKind::Select);
    b.select_add_target("People", None).unwrap();
    b.select_add_field("Name", None, None).unwrap();
    let stmt = b.get_statement().unwrap();
    assert_eq!(
        stmt.to_sql(&PostgresDialect::new()),
        "SELECT \"Name\" FROM \"People\""
    );
}

#[test]
fn select_operations_rejected_on_other_kinds() {
    let mut b = builder(StatementKind::Delete);
    b.set_table("t").unwrap();
    let before = b.to_sql_statement().unwrap();
    assert!(matches!(
        b.select_add_target("x", None),
        Err(BuilderError::WrongStatementKind { .. })
    ));
    assert!(matches!(
        b.select_add_field("x", None, None),
        Err(BuilderError::WrongStatementKind { .. })
    ));
    assert_eq!(b.to_sql_statement().unwrap(), before);
}
