//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written, flavour-aware lexer for SQL that
//! produces a stream of tokens, merges two-word keywords and tracks
//! procedural block nesting to find statement boundaries.

mod config;
mod error;
mod span;
mod split;
mod token;
mod tokenizer;

pub use config::{Flavour, LexMode, LexerConfig};
pub use error::SyntaxError;
pub use span::{Position, Span};
pub use split::{split_statements, tokenize_statement};
pub use token::{Keyword, ParamSpecKey, Token, TokenKind};
pub use tokenizer::Lexer;
