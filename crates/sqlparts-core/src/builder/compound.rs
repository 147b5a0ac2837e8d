//! Compound statement operations.

use super::expr::{into_query, take_query};
use super::SqlBuilder;
use crate::ast::{CompoundKind, Statement, StatementKind};
use crate::error::Result;

impl SqlBuilder {
    /// Sets the operator combining the members of a compound statement.
    ///
    /// # Errors
    ///
    /// Fails for non-compound statements.
    pub fn compound_set_type(&mut self, kind: CompoundKind) -> Result<()> {
        self.run("compound_set_type", |b| {
            b.require("compound_set_type", StatementKind::Compound)?;
            if let Statement::Compound(compound) = b.statement_mut()? {
                compound.kind = kind;
            }
            Ok(())
        })
    }

    /// Appends `statement` to a compound statement, taking ownership.
    ///
    /// # Errors
    ///
    /// Fails for non-compound builders or if `statement` is not a SELECT
    /// or compound statement.
    pub fn compound_add_sub_select(&mut self, statement: Statement) -> Result<()> {
        self.run("compound_add_sub_select", |b| {
            b.require("compound_add_sub_select", StatementKind::Compound)?;
            let query = into_query(statement)?;
            if let Statement::Compound(compound) = b.statement_mut()? {
                compound.statements.push(query);
            }
            Ok(())
        })
    }

    /// Appends a copy of `statement` to a compound statement.
    ///
    /// # Errors
    ///
    /// Fails like [`SqlBuilder::compound_add_sub_select`].
    pub fn compound_add_sub_select_copy(&mut self, statement: &Statement) -> Result<()> {
        self.compound_add_sub_select(statement.clone())
    }

    /// Appends the statement of `source` to a compound statement.
    ///
    /// With `steal` the statement is taken out of `source`; otherwise it is
    /// copied and `source` stays usable.
    ///
    /// # Errors
    ///
    /// Fails for non-compound builders, or if `source` is empty or does not
    /// build a SELECT or compound statement.
    pub fn compound_add_sub_select_from_builder(
        &mut self,
        source: &mut Self,
        steal: bool,
    ) -> Result<()> {
        self.run("compound_add_sub_select_from_builder", |b| {
            b.require("compound_add_sub_select_from_builder", StatementKind::Compound)?;
            let query = take_query(source, steal)?;
            if let Statement::Compound(compound) = b.statement_mut()? {
                compound.statements.push(query);
            }
            Ok(())
        })
    }
}
