//! Expression-building operations.

use tracing::debug;

use super::{Part, PartId, PartKind, SqlBuilder};
use crate::ast::{
    CaseExpr, Expr, FunctionCall, Operator, ParamSpec, Query, Statement, StatementKind, WhenThen,
};
use crate::error::{BuilderError, Result};
use crate::value::{ToSqlValue, Value, ValueKind, ValueRenderer};

impl SqlBuilder {
    /// Registers an identifier expression (a column or table name).
    ///
    /// Pass `None` as `id` to let the builder pick an ID.
    ///
    /// # Errors
    ///
    /// Fails if `id` is already in use or the builder is empty.
    pub fn add_id(&mut self, id: Option<PartId>, name: &str) -> Result<PartId> {
        self.run("add_id", |b| {
            b.statement()?;
            b.register_expr(id, Expr::identifier(name))
        })
    }

    /// Registers the identifier `table.field` (or just `field`).
    ///
    /// # Errors
    ///
    /// Fails if `id` is already in use or the builder is empty.
    pub fn add_qualified_id(
        &mut self,
        id: Option<PartId>,
        field: &str,
        table: Option<&str>,
    ) -> Result<PartId> {
        let name = qualified_name(field, table);
        self.run("add_qualified_id", |b| {
            b.statement()?;
            b.register_expr(id, Expr::Identifier(name))
        })
    }

    /// Renders `value` to SQL text and registers it as a literal.
    ///
    /// `renderer` overrides the builder's renderer for the value's kind.
    /// A null value always becomes `NULL`.
    ///
    /// # Errors
    ///
    /// Fails if no renderer handles the value, or if `id` is in use.
    pub fn add_expr_value(
        &mut self,
        id: Option<PartId>,
        renderer: Option<&dyn ValueRenderer>,
        value: &Value,
    ) -> Result<PartId> {
        self.run("add_expr_value", |b| {
            b.statement()?;
            b.registry.check_available(id)?;
            let expr = b.value_expr(renderer, value)?;
            b.register_expr(id, expr)
        })
    }

    /// Converts `value` to `kind`, then behaves like
    /// [`SqlBuilder::add_expr_value`].
    ///
    /// # Errors
    ///
    /// Fails if the conversion or the rendering fails.
    pub fn add_expr(
        &mut self,
        id: Option<PartId>,
        renderer: Option<&dyn ValueRenderer>,
        kind: ValueKind,
        value: impl ToSqlValue,
    ) -> Result<PartId> {
        match value.to_sql_value().coerce(kind) {
            Ok(value) => self.add_expr_value(id, renderer, &value),
            Err(err) => self.run("add_expr", |_| Err(err.into())),
        }
    }

    /// Registers a parameter placeholder.
    ///
    /// # Errors
    ///
    /// Fails if `id` is already in use or the builder is empty.
    pub fn add_param(
        &mut self,
        id: Option<PartId>,
        name: &str,
        kind: ValueKind,
        nullable: bool,
    ) -> Result<PartId> {
        self.run("add_param", |b| {
            b.statement()?;
            let spec = ParamSpec::new(name, kind).nullable(nullable);
            b.register_expr(id, Expr::Param(spec))
        })
    }

    /// Registers `operator` applied to one, two or three operands.
    ///
    /// `op3` is only used when `op2` is given.
    ///
    /// # Errors
    ///
    /// Fails if an operand does not name an expression.
    pub fn add_cond(
        &mut self,
        id: Option<PartId>,
        operator: Operator,
        op1: PartId,
        op2: Option<PartId>,
        op3: Option<PartId>,
    ) -> Result<PartId> {
        let mut operands = vec![op1];
        if let Some(op2) = op2 {
            operands.push(op2);
            operands.extend(op3);
        }
        self.run("add_cond", |b| {
            b.statement()?;
            b.registry.check_available(id)?;
            let operands = b.registry.use_exprs(&operands)?;
            b.register_expr(id, Expr::operation(operator, operands))
        })
    }

    /// Registers `operator` applied to any number of operands.
    ///
    /// With a single operand no operation is built: the operand itself is
    /// returned, or copied under `id` when one is requested.
    ///
    /// # Errors
    ///
    /// Fails on an empty operand list or an unknown operand.
    pub fn add_cond_v(
        &mut self,
        id: Option<PartId>,
        operator: Operator,
        operands: &[PartId],
    ) -> Result<PartId> {
        self.run("add_cond_v", |b| {
            b.statement()?;
            b.registry.check_available(id)?;
            match operands {
                [] => Err(BuilderError::MissingOperand("condition operand")),
                [single] => {
                    let expr = b.registry.expr(*single)?.clone();
                    match id {
                        Some(id) => b.register_expr(Some(id), expr),
                        None => {
                            debug!(id = single.get(), "single operand returned as is");
                            Ok(*single)
                        }
                    }
                }
                _ => {
                    let operands = b.registry.use_exprs(operands)?;
                    b.register_expr(id, Expr::operation(operator, operands))
                }
            }
        })
    }

    /// Registers a call to function `name` with the given arguments.
    ///
    /// # Errors
    ///
    /// Fails if any argument does not name an expression; nothing is
    /// registered in that case.
    pub fn add_function(
        &mut self,
        id: Option<PartId>,
        name: &str,
        args: &[PartId],
    ) -> Result<PartId> {
        self.run("add_function", |b| {
            b.statement()?;
            b.registry.check_available(id)?;
            let args = b.registry.use_exprs(args)?;
            let call = FunctionCall {
                name: name.to_string(),
                args,
            };
            b.register_expr(id, Expr::Function(call))
        })
    }

    /// Registers a CASE expression.
    ///
    /// `base` is the tested value of a simple CASE; `when` and `then` hold
    /// the branch conditions and results pairwise.
    ///
    /// # Errors
    ///
    /// Fails if `when` and `then` differ in length or any ID does not name
    /// an expression; nothing is registered in that case.
    pub fn add_case(
        &mut self,
        id: Option<PartId>,
        base: Option<PartId>,
        else_expr: Option<PartId>,
        when: &[PartId],
        then: &[PartId],
    ) -> Result<PartId> {
        self.run("add_case", |b| {
            b.statement()?;
            b.registry.check_available(id)?;
            if when.len() != then.len() {
                return Err(BuilderError::CaseArity {
                    when: when.len(),
                    then: then.len(),
                });
            }
            let base = b.registry.use_expr(base)?.map(Box::new);
            let else_expr = b.registry.use_expr(else_expr)?.map(Box::new);
            let branches = b
                .registry
                .use_exprs(when)?
                .into_iter()
                .zip(b.registry.use_exprs(then)?)
                .map(|(when, then)| WhenThen { when, then })
                .collect();
            let case = CaseExpr {
                base,
                branches,
                else_expr,
            };
            b.register_expr(id, Expr::Case(case))
        })
    }

    /// Registers `statement` as a sub-select expression, taking ownership.
    ///
    /// # Errors
    ///
    /// Fails if `statement` is not a SELECT or compound statement.
    pub fn add_sub_select(&mut self, id: Option<PartId>, statement: Statement) -> Result<PartId> {
        self.run("add_sub_select", |b| {
            b.statement()?;
            b.registry.check_available(id)?;
            let query = into_query(statement)?;
            b.register_expr(id, Expr::SubSelect(Box::new(query)))
        })
    }

    /// Registers a copy of `statement` as a sub-select expression.
    ///
    /// # Errors
    ///
    /// Fails if `statement` is not a SELECT or compound statement.
    pub fn add_sub_select_copy(
        &mut self,
        id: Option<PartId>,
        statement: &Statement,
    ) -> Result<PartId> {
        self.add_sub_select(id, statement.clone())
    }

    /// Registers the statement of `source` as a sub-select expression.
    ///
    /// With `steal` the statement is taken out of `source`, which becomes
    /// unusable; otherwise it is copied.
    ///
    /// # Errors
    ///
    /// Fails if `source` is empty or does not build a SELECT or compound
    /// statement; `source` is left untouched in that case.
    pub fn add_sub_select_from_builder(
        &mut self,
        id: Option<PartId>,
        source: &mut Self,
        steal: bool,
    ) -> Result<PartId> {
        self.run("add_sub_select_from_builder", |b| {
            b.statement()?;
            b.registry.check_available(id)?;
            let query = take_query(source, steal)?;
            b.register_expr(id, Expr::SubSelect(Box::new(query)))
        })
    }

    /// Returns a copy of the expression registered under `id`.
    #[must_use]
    pub fn export_expression(&self, id: PartId) -> Option<Expr> {
        match self.lookup(id, PartKind::Expr) {
            Some(Part::Expr(expr)) => Some(expr.clone()),
            _ => None,
        }
    }

    /// Registers an expression built elsewhere.
    ///
    /// # Errors
    ///
    /// Fails if `id` is already in use or the builder is empty.
    pub fn import_expression(&mut self, id: Option<PartId>, expr: Expr) -> Result<PartId> {
        self.run("import_expression", |b| {
            b.statement()?;
            b.register_expr(id, expr)
        })
    }

    /// Registers a copy of the expression `source_id` of another builder.
    ///
    /// # Errors
    ///
    /// Fails if `source_id` does not name an expression of `source`.
    pub fn import_expression_from_builder(
        &mut self,
        id: Option<PartId>,
        source: &Self,
        source_id: PartId,
    ) -> Result<PartId> {
        self.run("import_expression_from_builder", |b| {
            b.statement()?;
            let expr = source.registry.expr(source_id)?.clone();
            b.register_expr(id, expr)
        })
    }

    /// Builds the literal expression for `value`.
    pub(super) fn value_expr(
        &self,
        renderer: Option<&dyn ValueRenderer>,
        value: &Value,
    ) -> Result<Expr> {
        if value.is_null() {
            return Ok(Expr::null());
        }
        let sql = match renderer {
            Some(renderer) => renderer.render(value)?,
            None => self.renderers.render(value)?,
        };
        Ok(Expr::Literal(sql))
    }
}

/// Joins an optional table name and a field name with a dot.
pub(super) fn qualified_name(field: &str, table: Option<&str>) -> String {
    match table {
        Some(table) => format!("{table}.{field}"),
        None => field.to_string(),
    }
}

pub(super) fn into_query(statement: Statement) -> Result<Query> {
    statement
        .into_query()
        .map_err(|stmt| BuilderError::NotASubSelect(stmt.kind()))
}

/// Gets the statement of `source` as a query, leaving `source` untouched
/// on failure.
pub(super) fn take_query(source: &mut SqlBuilder, steal: bool) -> Result<Query> {
    source.statement()?;
    if !matches!(source.kind, StatementKind::Select | StatementKind::Compound) {
        return Err(BuilderError::NotASubSelect(source.kind));
    }
    let stmt = if steal {
        source.take_sql_statement()?
    } else {
        source.to_sql_statement()?
    };
    into_query(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operation;
    use crate::value::ValueError;

    fn id(raw: u32) -> PartId {
        PartId::new(raw).unwrap()
    }

    fn builder() -> SqlBuilder {
        SqlBuilder::new(StatementKind::Select)
    }

    #[test]
    fn test_add_id_with_requested_id() {
        let mut b = builder();
        assert_eq!(b.add_id(Some(id(5)), "age").unwrap(), id(5));
        assert_eq!(b.export_expression(id(5)), Some(Expr::identifier("age")));
    }

    #[test]
    fn test_add_id_duplicate() {
        let mut b = builder();
        b.add_id(Some(id(5)), "age").unwrap();
        assert_eq!(
            b.add_id(Some(id(5)), "name"),
            Err(BuilderError::DuplicatePartId(id(5)))
        );
        assert_eq!(b.export_expression(id(5)), Some(Expr::identifier("age")));
    }

    #[test]
    fn test_add_qualified_id() {
        let mut b = builder();
        let a = b.add_qualified_id(None, "name", Some("people")).unwrap();
        let c = b.add_qualified_id(None, "name", None).unwrap();
        assert_eq!(b.export_expression(a), Some(Expr::identifier("people.name")));
        assert_eq!(b.export_expression(c), Some(Expr::identifier("name")));
    }

    #[test]
    fn test_add_expr_value_renders() {
        let mut b = builder();
        let text = b
            .add_expr_value(None, None, &Value::Text("O'Brien".into()))
            .unwrap();
        let null = b.add_expr_value(None, None, &Value::Null).unwrap();
        assert_eq!(b.export_expression(text), Some(Expr::literal("'O''Brien'")));
        assert_eq!(b.export_expression(null), Some(Expr::null()));
    }

    #[test]
    fn test_add_expr_value_custom_renderer() {
        let mut b = builder();
        let upper = |v: &Value| -> std::result::Result<String, ValueError> {
            match v {
                Value::Text(s) => Ok(format!("'{}'", s.to_uppercase())),
                other => Err(ValueError::Rejected {
                    expected: ValueKind::Text,
                    found: other.kind(),
                }),
            }
        };
        let e = b
            .add_expr_value(None, Some(&upper), &Value::Text("abc".into()))
            .unwrap();
        assert_eq!(b.export_expression(e), Some(Expr::literal("'ABC'")));
    }

    #[test]
    fn test_add_expr_value_without_renderer_fails() {
        let mut b = builder();
        b.renderers_mut().unregister(ValueKind::Int);
        assert_eq!(
            b.add_expr_value(None, None, &Value::Int(1)),
            Err(BuilderError::Value(ValueError::NoRenderer(ValueKind::Int)))
        );
        assert!(b.registry().is_empty());
    }

    #[test]
    fn test_add_expr_coerces() {
        let mut b = builder();
        let e = b.add_expr(None, None, ValueKind::Text, 42_i64).unwrap();
        assert_eq!(b.export_expression(e), Some(Expr::literal("'42'")));
    }

    #[test]
    fn test_add_param() {
        let mut b = builder();
        let p = b.add_param(None, "age", ValueKind::Int, true).unwrap();
        assert_eq!(
            b.export_expression(p),
            Some(Expr::Param(ParamSpec::new("age", ValueKind::Int).nullable(true)))
        );
    }

    #[test]
    fn test_add_cond_arities() {
        let mut b = builder();
        let a = b.add_id(None, "a").unwrap();
        let one = b.add_expr_value(None, None, &Value::Int(1)).unwrap();
        let two = b.add_expr_value(None, None, &Value::Int(2)).unwrap();

        let unary = b.add_cond(None, Operator::IsNull, a, None, None).unwrap();
        let between = b
            .add_cond(None, Operator::Between, a, Some(one), Some(two))
            .unwrap();
        let ignored = b.add_cond(None, Operator::Not, a, None, Some(two)).unwrap();

        let count = |e: Option<Expr>| match e {
            Some(Expr::Operation(Operation { operands, .. })) => operands.len(),
            _ => 0,
        };
        assert_eq!(count(b.export_expression(unary)), 1);
        assert_eq!(count(b.export_expression(between)), 3);
        assert_eq!(count(b.export_expression(ignored)), 1);
    }

    #[test]
    fn test_add_cond_unknown_operand_registers_nothing() {
        let mut b = builder();
        let a = b.add_id(None, "a").unwrap();
        let before = b.registry().len();
        assert_eq!(
            b.add_cond(None, Operator::Eq, a, Some(id(77)), None),
            Err(BuilderError::UnknownPart(id(77)))
        );
        assert_eq!(b.registry().len(), before);
    }

    #[test]
    fn test_add_cond_v_single_operand() {
        let mut b = builder();
        let a = b.add_id(None, "a").unwrap();
        assert_eq!(b.add_cond_v(None, Operator::And, &[a]).unwrap(), a);
        let copy = b.add_cond_v(Some(id(9)), Operator::Or, &[a]).unwrap();
        assert_eq!(copy, id(9));
        assert_eq!(b.export_expression(copy), b.export_expression(a));
    }

    #[test]
    fn test_add_cond_v_many_and_none() {
        let mut b = builder();
        let a = b.add_id(None, "a").unwrap();
        let c = b.add_id(None, "c").unwrap();
        let and = b.add_cond_v(None, Operator::And, &[a, c]).unwrap();
        assert_eq!(
            b.export_expression(and),
            Some(Expr::operation(
                Operator::And,
                vec![Expr::identifier("a"), Expr::identifier("c")]
            ))
        );
        assert_eq!(
            b.add_cond_v(None, Operator::And, &[]),
            Err(BuilderError::MissingOperand("condition operand"))
        );
    }

    #[test]
    fn test_add_function() {
        let mut b = builder();
        let a = b.add_id(None, "a").unwrap();
        let f = b.add_function(None, "lower", &[a]).unwrap();
        assert_eq!(
            b.export_expression(f),
            Some(Expr::Function(FunctionCall {
                name: "lower".into(),
                args: vec![Expr::identifier("a")],
            }))
        );
        let before = b.registry().len();
        assert!(b.add_function(None, "upper", &[a, id(3)]).is_err());
        assert_eq!(b.registry().len(), before);
    }

    #[test]
    fn test_add_case() {
        let mut b = builder();
        let x = b.add_id(None, "x").unwrap();
        let one = b.add_expr_value(None, None, &Value::Int(1)).unwrap();
        let yes = b.add_expr_value(None, None, &Value::Text("yes".into())).unwrap();
        let no = b.add_expr_value(None, None, &Value::Text("no".into())).unwrap();
        let case = b.add_case(None, Some(x), Some(no), &[one], &[yes]).unwrap();
        let Some(Expr::Case(case)) = b.export_expression(case) else {
            panic!("expected case");
        };
        assert_eq!(case.base.as_deref(), Some(&Expr::identifier("x")));
        assert_eq!(case.branches.len(), 1);
        assert_eq!(case.else_expr.as_deref(), Some(&Expr::literal("'no'")));
    }

    #[test]
    fn test_add_case_unbalanced() {
        let mut b = builder();
        let x = b.add_id(None, "x").unwrap();
        assert_eq!(
            b.add_case(None, None, None, &[x, x], &[x]),
            Err(BuilderError::CaseArity { when: 2, then: 1 })
        );
    }

    #[test]
    fn test_add_sub_select_rejects_dml() {
        let mut b = builder();
        assert_eq!(
            b.add_sub_select(None, Statement::new(StatementKind::Insert)),
            Err(BuilderError::NotASubSelect(StatementKind::Insert))
        );
    }

    #[test]
    fn test_sub_select_from_builder_steal_and_copy() {
        let mut inner = builder();
        inner.select_add_field("a", None, None).unwrap();

        let mut outer = builder();
        outer
            .add_sub_select_from_builder(None, &mut inner, false)
            .unwrap();
        assert!(!inner.is_exhausted());

        outer
            .add_sub_select_from_builder(None, &mut inner, true)
            .unwrap();
        assert!(inner.is_exhausted());
        assert_eq!(
            outer.add_sub_select_from_builder(None, &mut inner, true),
            Err(BuilderError::Empty)
        );
    }

    #[test]
    fn test_sub_select_from_dml_builder_left_intact() {
        let mut inner = SqlBuilder::new(StatementKind::Delete);
        let mut outer = builder();
        assert_eq!(
            outer.add_sub_select_from_builder(None, &mut inner, true),
            Err(BuilderError::NotASubSelect(StatementKind::Delete))
        );
        assert!(!inner.is_exhausted());
    }

    #[test]
    fn test_import_expression_from_builder() {
        let mut src = builder();
        let a = src.add_id(None, "a").unwrap();
        let mut dst = builder();
        let copied = dst.import_expression_from_builder(None, &src, a).unwrap();
        assert_eq!(dst.export_expression(copied), Some(Expr::identifier("a")));
        assert!(dst
            .import_expression_from_builder(None, &src, id(1))
            .is_err());
    }
}
