//! # spanner-ddl-core
//!
//! Lexer, parser and canonical renderer for Cloud Spanner DDL.
//!
//! This crate provides:
//! - A hand-written lexer and recursive descent parser for the DDL
//!   statements that describe a database schema
//! - A typed AST with one type per construct
//! - A canonical `Display` rendering for every construct, stable across
//!   source formatting, suitable as an equality basis
//!
//! ```rust
//! use spanner_ddl_core::parse_ddl;
//!
//! let statements = parse_ddl(
//!     "create table Singers (\n  SingerId int64 not null,\n  Name string(max)\n) primary key (SingerId);",
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     statements[0].to_string(),
//!     "CREATE TABLE Singers (SingerId INT64 NOT NULL, Name STRING(MAX)) PRIMARY KEY (SingerId ASC)"
//! );
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Statement;
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{parse_ddl, ParseError, Parser};
