//! Builds a reporting query step by step, then splits a SQL script into
//! statements.
//!
//! Run with `cargo run --example people_report`.

use sqlparts_core::ast::{JoinKind, Operator, StatementKind};
use sqlparts_core::builder::SqlBuilder;
use sqlparts_core::dialect::{PostgresDialect, SqliteDialect};
use sqlparts_core::lexer::{split_statements, LexerConfig};
use sqlparts_core::value::{Value, ValueKind};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut b = SqlBuilder::new(StatementKind::Select);
    let people = b.select_add_target("people", Some("p"))?;
    let orders = b.select_add_target("orders", Some("o"))?;
    let pid = b.add_qualified_id(None, "id", Some("p"))?;
    let oid = b.add_qualified_id(None, "person_id", Some("o"))?;
    let on = b.add_cond(None, Operator::Eq, pid, Some(oid), None)?;
    b.select_join_targets(None, people, orders, JoinKind::Left, Some(on))?;

    let name = b.select_add_field("name", Some("p"), None)?;
    let total = b.add_qualified_id(None, "total", Some("o"))?;
    let sum = b.add_function(None, "sum", &[total])?;
    let spent = b.add_id(None, "spent")?;
    b.add_field_id(sum, Some(spent))?;

    let age = b.add_qualified_id(None, "age", Some("p"))?;
    let min_age = b.add_param(None, "min_age", ValueKind::Int, false)?;
    let adult = b.add_cond(None, Operator::Geq, age, Some(min_age), None)?;
    b.set_where(Some(adult))?;
    b.select_group_by(Some(name))?;
    b.select_order_by(sum, false, None)?;
    let limit = b.add_expr_value(None, None, &Value::Int(10))?;
    b.select_set_limit(Some(limit), None)?;

    let stmt = b.get_statement()?;
    println!("generic:    {stmt}");
    println!("postgresql: {}", stmt.to_sql(&PostgresDialect::new()));
    println!("sqlite:     {}", stmt.to_sql(&SqliteDialect::new()));
    println!("json:       {}", stmt.statement().to_json()?);

    let script = "BEGIN; UPDATE people SET age = age + 1; COMMIT;";
    for (i, part) in split_statements(script, &LexerConfig::default())?
        .iter()
        .enumerate()
    {
        println!("statement {i}: {part}");
    }
    Ok(())
}
