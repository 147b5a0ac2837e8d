//! # sqlparts-core
//!
//! An incremental SQL statement builder and a flavour-aware SQL tokenizer.
//!
//! This crate provides:
//! - A statement tree for SELECT, INSERT, UPDATE, DELETE and compound
//!   statements, with structural validation
//! - [`SqlBuilder`], which assembles one statement through calls that
//!   register reusable parts under numeric IDs
//! - A tokenizer that recognizes flavour-specific keywords and literals and
//!   finds statement boundaries across procedural blocks
//! - Dialect-aware rendering back to SQL text
//!
//! ## Building a statement
//!
//! ```rust
//! use sqlparts_core::ast::{Operator, StatementKind};
//! use sqlparts_core::builder::SqlBuilder;
//! use sqlparts_core::value::{Value, ValueKind};
//!
//! let mut b = SqlBuilder::new(StatementKind::Update);
//! b.set_table("people").unwrap();
//! b.add_field("age", ValueKind::Int, 31).unwrap();
//! let name = b.add_id(None, "name").unwrap();
//! let value = b.add_expr_value(None, None, &Value::Text("Ann".into())).unwrap();
//! let cond = b.add_cond(None, Operator::Eq, name, Some(value), None).unwrap();
//! b.set_where(Some(cond)).unwrap();
//!
//! let stmt = b.get_statement().unwrap();
//! assert_eq!(stmt.to_string(), "UPDATE people SET age = 31 WHERE name = 'Ann'");
//! ```
//!
//! ## Splitting SQL text
//!
//! ```rust
//! use sqlparts_core::lexer::{split_statements, LexerConfig};
//!
//! let sql = "CREATE PROCEDURE p() BEGIN UPDATE t SET a = 1; END; SELECT 1";
//! let parts = split_statements(sql, &LexerConfig::default()).unwrap();
//! assert_eq!(parts.len(), 2);
//! assert_eq!(parts[1], "SELECT 1");
//! ```

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod render;
pub mod value;

pub use ast::{Expr, Statement, StatementKind};
pub use builder::{PartId, SqlBuilder, ValidatedStatement};
pub use error::{BuilderError, Result};
pub use lexer::{Lexer, LexerConfig, SyntaxError, Token, TokenKind};
pub use value::{Value, ValueKind};
