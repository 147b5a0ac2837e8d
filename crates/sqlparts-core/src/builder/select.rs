//! SELECT-only operations: FROM targets, joins, ordering and the other
//! clauses.

use tracing::debug;

use super::{Part, PartId, SqlBuilder};
use crate::ast::{Expr, Field, JoinKind, OrderBy, SelectJoin, SelectTarget};
use crate::error::{BuilderError, Result};

impl SqlBuilder {
    /// Adds a FROM target whose source is the expression `source`.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements, if `source` does not name an
    /// expression, or if `id` is already in use. Adding a source and alias
    /// that are already present returns the existing target's ID and
    /// ignores `id`.
    pub fn select_add_target_id(
        &mut self,
        id: Option<PartId>,
        source: PartId,
        alias: Option<&str>,
    ) -> Result<PartId> {
        self.run("select_add_target_id", |b| {
            b.select_mut("select_add_target_id")?;
            let expr = b.registry.expr(source)?.clone();
            b.push_target(id, expr, alias)
        })
    }

    /// Adds the table `name` as a FROM target.
    ///
    /// The table name is not registered as an expression. Adding the same
    /// name and alias twice returns the first target's ID.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements.
    pub fn select_add_target(&mut self, name: &str, alias: Option<&str>) -> Result<PartId> {
        self.run("select_add_target", |b| {
            b.select_mut("select_add_target")?;
            b.push_target(None, Expr::identifier(name), alias)
        })
    }

    /// Joins two FROM targets and returns the join's ID.
    ///
    /// The join is recorded at the position of the later target. When
    /// `left` comes after `right` in the FROM list the two swap roles, and
    /// LEFT and RIGHT joins swap with them.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements, for unknown targets, when joining a
    /// target with itself, or if `condition` does not name an expression.
    pub fn select_join_targets(
        &mut self,
        id: Option<PartId>,
        left: PartId,
        right: PartId,
        kind: JoinKind,
        condition: Option<PartId>,
    ) -> Result<PartId> {
        self.run("select_join_targets", |b| {
            b.select_mut("select_join_targets")?;
            b.registry.check_available(id)?;
            let left_pos = b.target_position(left)?;
            let right_pos = b.target_position(right)?;
            let (position, kind) = match left_pos.cmp(&right_pos) {
                std::cmp::Ordering::Less => (right_pos, kind),
                std::cmp::Ordering::Greater => {
                    debug!(left_pos, right_pos, "join targets swapped");
                    (left_pos, kind.mirrored())
                }
                std::cmp::Ordering::Equal => return Err(BuilderError::SelfJoin(left)),
            };
            let condition = b.registry.use_expr(condition)?;
            let join_id = b.registry.register(id, Part::Join)?;
            b.select_mut("select_join_targets")?
                .from
                .get_or_insert_with(Default::default)
                .joins
                .push(SelectJoin {
                    kind,
                    position,
                    condition,
                    using: Vec::new(),
                });
            b.join_ids.push(join_id);
            Ok(join_id)
        })
    }

    /// Adds a `USING` column to a join.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements or if `join` is not a join of this
    /// statement.
    pub fn join_add_field(&mut self, join: PartId, field: &str) -> Result<()> {
        self.run("join_add_field", |b| {
            b.select_mut("join_add_field")?;
            let index = b
                .join_ids
                .iter()
                .position(|j| *j == join)
                .ok_or(BuilderError::UnknownJoin(join))?;
            let select = b.select_mut("join_add_field")?;
            let joins = select.from.as_mut().map(|from| &mut from.joins);
            let target = joins
                .and_then(|joins| joins.get_mut(index))
                .ok_or(BuilderError::UnknownJoin(join))?;
            target.using.push(Field::new(field));
            Ok(())
        })
    }

    /// Appends an ORDER BY entry.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements or if `expr` does not name an
    /// expression.
    pub fn select_order_by(
        &mut self,
        expr: PartId,
        ascending: bool,
        collation: Option<&str>,
    ) -> Result<()> {
        self.run("select_order_by", |b| {
            b.select_mut("select_order_by")?;
            let expr = b.registry.expr(expr)?.clone();
            b.select_mut("select_order_by")?.order_by.push(OrderBy {
                expr,
                ascending,
                collation: collation.map(str::to_string),
            });
            Ok(())
        })
    }

    /// Sets DISTINCT, optionally with a `DISTINCT ON` expression.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements or if `on` does not name an
    /// expression.
    pub fn select_set_distinct(&mut self, distinct: bool, on: Option<PartId>) -> Result<()> {
        self.run("select_set_distinct", |b| {
            b.select_mut("select_set_distinct")?;
            let on = b.registry.use_expr(on)?;
            let select = b.select_mut("select_set_distinct")?;
            select.distinct = distinct;
            select.distinct_on = on;
            Ok(())
        })
    }

    /// Sets (or with `None`, clears) LIMIT and OFFSET.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements or for unknown expressions.
    pub fn select_set_limit(&mut self, count: Option<PartId>, offset: Option<PartId>) -> Result<()> {
        self.run("select_set_limit", |b| {
            b.select_mut("select_set_limit")?;
            let count = b.registry.use_expr(count)?;
            let offset = b.registry.use_expr(offset)?;
            let select = b.select_mut("select_set_limit")?;
            select.limit = count;
            select.offset = offset;
            Ok(())
        })
    }

    /// Sets (or with `None`, clears) the HAVING condition.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements or for an unknown expression.
    pub fn select_set_having(&mut self, cond: Option<PartId>) -> Result<()> {
        self.run("select_set_having", |b| {
            b.select_mut("select_set_having")?;
            let cond = b.registry.use_expr(cond)?;
            b.select_mut("select_set_having")?.having = cond;
            Ok(())
        })
    }

    /// Appends a GROUP BY expression; `None` clears the list.
    ///
    /// # Errors
    ///
    /// Fails for non-SELECT statements or for an unknown expression.
    pub fn select_group_by(&mut self, expr: Option<PartId>) -> Result<()> {
        self.run("select_group_by", |b| {
            b.select_mut("select_group_by")?;
            let expr = b.registry.use_expr(expr)?;
            let select = b.select_mut("select_group_by")?;
            match expr {
                Some(expr) => select.group_by.push(expr),
                None => select.group_by.clear(),
            }
            Ok(())
        })
    }

    /// Appends a FROM target, or returns the ID of an existing target with
    /// the same source and alias.
    fn push_target(&mut self, id: Option<PartId>, expr: Expr, alias: Option<&str>) -> Result<PartId> {
        let existing = self.select_mut("select_add_target")?.from.as_ref().and_then(|from| {
            from.targets
                .iter()
                .position(|t| t.expr == expr && t.alias.as_deref() == alias)
        });
        if let Some(target_id) = existing.and_then(|index| self.target_ids.get(index).copied()) {
            debug!(%target_id, "target already present");
            return Ok(target_id);
        }
        let target_id = self.registry.register(id, Part::Target)?;
        self.select_mut("select_add_target")?
            .from
            .get_or_insert_with(Default::default)
            .targets
            .push(SelectTarget::new(expr, alias.map(str::to_string)));
        self.target_ids.push(target_id);
        Ok(target_id)
    }

    fn target_position(&self, target: PartId) -> Result<usize> {
        self.target_ids
            .iter()
            .position(|t| *t == target)
            .ok_or(BuilderError::UnknownTarget(target))
    }
}
