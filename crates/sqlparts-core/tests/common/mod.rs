#![allow(dead_code)]

use sqlparts_core::ast::{
    CompoundStatement, DeleteStatement, InsertStatement, SelectStatement, Statement,
    StatementKind, UpdateStatement,
};
use sqlparts_core::builder::SqlBuilder;
use sqlparts_core::dialect::GenericDialect;

/// Routes builder warnings to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn builder(kind: StatementKind) -> SqlBuilder {
    init_tracing();
    SqlBuilder::new(kind)
}

/// Validates the builder's statement and renders it with the generic dialect.
pub fn sql(b: &SqlBuilder) -> String {
    b.get_statement()
        .unwrap_or_else(|e| panic!("Statement failed validation: {e}"))
        .to_sql(&GenericDialect::new())
}

pub fn select_of(b: &SqlBuilder) -> SelectStatement {
    match b.sql_statement() {
        Some(Statement::Select(s)) => s.clone(),
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn insert_of(b: &SqlBuilder) -> InsertStatement {
    match b.sql_statement() {
        Some(Statement::Insert(i)) => i.clone(),
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn update_of(b: &SqlBuilder) -> UpdateStatement {
    match b.sql_statement() {
        Some(Statement::Update(u)) => u.clone(),
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn delete_of(b: &SqlBuilder) -> DeleteStatement {
    match b.sql_statement() {
        Some(Statement::Delete(d)) => d.clone(),
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

pub fn compound_of(b: &SqlBuilder) -> CompoundStatement {
    match b.sql_statement() {
        Some(Statement::Compound(c)) => c.clone(),
        other => panic!("Expected COMPOUND, got {other:?}"),
    }
}

/// A SELECT builder projecting `field` from `table`.
pub fn simple_select(field: &str, table: &str) -> SqlBuilder {
    let mut b = builder(StatementKind::Select);
    b.select_add_field(field, None, None).unwrap();
    b.select_add_target(table, None).unwrap();
    b
}
