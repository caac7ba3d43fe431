//! DDL Parser
//!
//! A hand-written recursive descent parser for Cloud Spanner DDL.
//! Expressions are kept as canonical token text rather than parsed.

mod canonical;
mod error;
mod parser;

pub use canonical::quote_string;
pub use error::ParseError;
pub use parser::Parser;

use crate::ast::Statement;

/// Parses a DDL text into its statements.
///
/// # Errors
///
/// Returns a `ParseError` for the first statement that does not parse.
pub fn parse_ddl(source: &str) -> Result<Vec<Statement>, ParseError> {
    Parser::new(source).parse_ddl()
}
