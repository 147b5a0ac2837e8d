//! Tests for expression parts: IDs, literals, parameters, conditions,
//! functions, CASE, sub-selects and moving expressions between builders.

mod common;
use common::*;

use sqlparts_core::ast::{Expr, Operator, StatementKind};
use sqlparts_core::builder::{PartId, PartKind};
use sqlparts_core::value::{Value, ValueError, ValueKind, ValueRenderers};
use sqlparts_core::BuilderError;

fn pid(raw: u32) -> PartId {
    PartId::new(raw).unwrap()
}

#[test]
fn caller_ids_round_trip() {
    let mut b = builder(StatementKind::Select);
    let id = b.add_id(Some(pid(7)), "age").unwrap();
    assert_eq!(id, pid(7));
    assert_eq!(b.export_expression(id), Some(Expr::identifier("age")));
    assert_eq!(
        b.add_id(Some(pid(7)), "other"),
        Err(BuilderError::DuplicatePartId(pid(7)))
    );
    assert_eq!(b.export_expression(id), Some(Expr::identifier("age")));
}

#[test]
fn automatic_ids_are_distinct_and_skip_taken_ones() {
    let mut b = builder(StatementKind::Select);
    b.add_id(Some(pid(u32::MAX)), "taken").unwrap();
    let first = b.add_id(None, "a").unwrap();
    let second = b.add_id(None, "b").unwrap();
    assert_ne!(first, pid(u32::MAX));
    assert_ne!(first, second);
    assert_eq!(b.registry().len(), 3);
}

#[test]
fn unknown_and_wrong_kind_ids() {
    let mut b = builder(StatementKind::Select);
    assert_eq!(
        b.add_cond(None, Operator::Not, pid(99), None, None),
        Err(BuilderError::UnknownPart(pid(99)))
    );
    let target = b.select_add_target("t", None).unwrap();
    assert!(matches!(
        b.add_cond(None, Operator::Not, target, None, None),
        Err(BuilderError::WrongPartKind {
            expected: PartKind::Expr,
            found: PartKind::Target,
            ..
        })
    ));
    assert!(b.lookup(target, PartKind::Target).is_some());
    assert!(b.lookup(target, PartKind::Expr).is_none());
}

#[test]
fn cond_between_and_unary() {
    let mut b = builder(StatementKind::Select);
    let x = b.add_id(None, "x").unwrap();
    let lo = b.add_expr(None, None, ValueKind::Int, 1).unwrap();
    let hi = b.add_expr(None, None, ValueKind::Int, 9).unwrap();
    let between = b
        .add_cond(None, Operator::Between, x, Some(lo), Some(hi))
        .unwrap();
    let null = b.add_cond(None, Operator::IsNull, x, None, None).unwrap();
    let either = b
        .add_cond(None, Operator::Or, between, Some(null), None)
        .unwrap();
    b.set_where(Some(either)).unwrap();
    b.select_add_field("x", None, None).unwrap();
    b.select_add_target("t", None).unwrap();
    assert_eq!(
        sql(&b),
        "SELECT x FROM t WHERE (x BETWEEN 1 AND 9) OR (x IS NULL)"
    );
}

#[test]
fn cond_third_operand_ignored_without_second() {
    let mut b = builder(StatementKind::Select);
    let x = b.add_id(None, "x").unwrap();
    let y = b.add_id(None, "y").unwrap();
    let cond = b.add_cond(None, Operator::Not, x, None, Some(y)).unwrap();
    assert_eq!(
        b.export_expression(cond),
        Some(Expr::operation(Operator::Not, vec![Expr::identifier("x")]))
    );
}

#[test]
fn cond_v_collapses_single_operand() {
    let mut b = builder(StatementKind::Select);
    let x = b.add_id(None, "x").unwrap();
    assert_eq!(b.add_cond_v(None, Operator::And, &[x]), Ok(x));

    let copy = b.add_cond_v(Some(pid(3)), Operator::And, &[x]).unwrap();
    assert_eq!(copy, pid(3));
    assert_eq!(b.export_expression(copy), Some(Expr::identifier("x")));

    assert_eq!(
        b.add_cond_v(None, Operator::And, &[]),
        Err(BuilderError::MissingOperand("condition operand"))
    );
}

#[test]
fn cond_v_builds_n_ary_operation() {
    let mut b = builder(StatementKind::Select);
    let ids: Vec<PartId> = ["a", "b", "c"]
        .iter()
        .map(|n| b.add_id(None, n).unwrap())
        .collect();
    let all = b.add_cond_v(None, Operator::And, &ids).unwrap();
    b.set_where(Some(all)).unwrap();
    b.select_add_field("a", None, None).unwrap();
    assert_eq!(sql(&b), "SELECT a WHERE a AND b AND c");
}

#[test]
fn in_list_and_in_sub_select() {
    let mut b = builder(StatementKind::Select);
    let x = b.add_id(None, "x").unwrap();
    let one = b.add_expr_value(None, None, &Value::Int(1)).unwrap();
    let two = b.add_expr_value(None, None, &Value::Int(2)).unwrap();
    let list = b.add_cond_v(None, Operator::In, &[x, one, two]).unwrap();
    let mut inner = simple_select("id", "banned");
    let sub = b.add_sub_select_from_builder(None, &mut inner, true).unwrap();
    let not_in = b.add_cond(None, Operator::NotIn, x, Some(sub), None).unwrap();
    let both = b.add_cond(None, Operator::And, list, Some(not_in), None).unwrap();
    b.set_where(Some(both)).unwrap();
    b.select_add_field("x", None, None).unwrap();
    b.select_add_target("t", None).unwrap();
    assert_eq!(
        sql(&b),
        "SELECT x FROM t WHERE (x IN (1, 2)) AND (x NOT IN (SELECT id FROM banned))"
    );
}

#[test]
fn wrong_operand_count_fails_validation() {
    let mut b = simple_select("x", "t");
    let x = b.add_id(None, "x").unwrap();
    let cond = b.add_cond(None, Operator::Between, x, None, None).unwrap();
    b.set_where(Some(cond)).unwrap();
    assert!(matches!(
        b.get_statement(),
        Err(BuilderError::Structure(_))
    ));
}

#[test]
fn function_and_case() {
    let mut b = builder(StatementKind::Select);
    let status = b.add_id(None, "status").unwrap();
    let one = b.add_expr(None, None, ValueKind::Int, 1).unwrap();
    let active = b.add_expr(None, None, ValueKind::Text, "active").unwrap();
    let other = b.add_expr(None, None, ValueKind::Text, "other").unwrap();
    let case = b
        .add_case(None, Some(status), Some(other), &[one], &[active])
        .unwrap();
    let label = b.add_id(None, "label").unwrap();
    b.add_field_id(case, Some(label)).unwrap();
    let name = b.add_id(None, "name").unwrap();
    let upper = b.add_function(None, "upper", &[name]).unwrap();
    b.add_field_id(upper, None).unwrap();
    b.select_add_target("t", None).unwrap();
    assert_eq!(
        sql(&b),
        "SELECT CASE status WHEN 1 THEN 'active' ELSE 'other' END AS label, upper(name) FROM t"
    );

    assert_eq!(
        b.add_case(None, None, None, &[one, one], &[active]),
        Err(BuilderError::CaseArity { when: 2, then: 1 })
    );
}

#[test]
fn params_render_in_placeholder_notation() {
    let mut b = simple_select("x", "t");
    let x = b.add_id(None, "x").unwrap();
    let p = b.add_param(None, "limit_x", ValueKind::Float, true).unwrap();
    let cond = b.add_cond(None, Operator::Leq, x, Some(p), None).unwrap();
    b.set_where(Some(cond)).unwrap();
    assert_eq!(
        sql(&b),
        "SELECT x FROM t WHERE x <= ##limit_x::float::null"
    );
}

#[test]
fn custom_renderers() {
    let mut renderers = ValueRenderers::with_defaults();
    renderers.register(ValueKind::Bool, |v: &Value| match v {
        Value::Bool(true) => Ok(String::from("1")),
        Value::Bool(false) => Ok(String::from("0")),
        other => Err(ValueError::Rejected {
            expected: ValueKind::Bool,
            found: other.kind(),
        }),
    });
    let mut b = sqlparts_core::SqlBuilder::with_renderers(StatementKind::Select, renderers);
    let flag = b.add_expr_value(None, None, &Value::Bool(true)).unwrap();
    assert_eq!(b.export_expression(flag), Some(Expr::literal("1")));

    b.renderers_mut().unregister(ValueKind::Blob);
    assert_eq!(
        b.add_expr_value(None, None, &Value::Blob(vec![1])),
        Err(BuilderError::Value(ValueError::NoRenderer(ValueKind::Blob)))
    );
}

#[test]
fn sub_select_steal_and_copy() {
    let mut b = builder(StatementKind::Select);

    let mut stolen = simple_select("id", "a");
    b.add_sub_select_from_builder(None, &mut stolen, true)
        .unwrap();
    assert!(stolen.is_exhausted());
    assert_eq!(stolen.sql_statement(), None);

    let mut copied = simple_select("id", "a");
    let sub = b
        .add_sub_select_from_builder(None, &mut copied, false)
        .unwrap();
    assert!(!copied.is_exhausted());
    copied.select_add_field("extra", None, None).unwrap();
    assert_eq!(sql(&copied), "SELECT id, extra FROM a");

    let Some(Expr::SubSelect(query)) = b.export_expression(sub) else {
        panic!("expected sub-select");
    };
    let sqlparts_core::ast::Query::Select(select) = *query else {
        panic!("expected SELECT");
    };
    assert_eq!(select.fields.len(), 1);
}

#[test]
fn sub_select_rejects_dml() {
    let mut b = builder(StatementKind::Select);
    let mut update = builder(StatementKind::Update);
    assert_eq!(
        b.add_sub_select_from_builder(None, &mut update, true),
        Err(BuilderError::NotASubSelect(StatementKind::Update))
    );
    assert!(!update.is_exhausted());
}

#[test]
fn expressions_move_between_builders() {
    let mut source = builder(StatementKind::Select);
    let x = source.add_id(None, "x").unwrap();
    let one = source.add_expr_value(None, None, &Value::Int(1)).unwrap();
    let cond = source
        .add_cond(None, Operator::Eq, x, Some(one), None)
        .unwrap();

    let mut target = builder(StatementKind::Delete);
    target.set_table("t").unwrap();
    let imported = target
        .import_expression_from_builder(None, &source, cond)
        .unwrap();
    target.set_where(Some(imported)).unwrap();
    assert_eq!(sql(&target), "DELETE FROM t WHERE x = 1");

    let exported = source.export_expression(cond).unwrap();
    let again = target.import_expression(Some(pid(1)), exported).unwrap();
    assert_eq!(again, pid(1));
    assert_eq!(source.export_expression(pid(12345)), None);
}

#[test]
fn parts_are_copied_into_statement() {
    let mut b = builder(StatementKind::Delete);
    b.set_table("t").unwrap();
    let x = b.add_id(None, "x").unwrap();
    let cond = b.add_cond(None, Operator::IsNull, x, None, None).unwrap();
    b.set_where(Some(cond)).unwrap();
    b.set_where(Some(cond)).unwrap();
    assert_eq!(sql(&b), "DELETE FROM t WHERE x IS NULL");
    assert!(b.export_expression(cond).is_some());
}
