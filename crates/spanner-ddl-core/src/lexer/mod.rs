//! DDL lexer.
//!
//! A hand-written lexer for Cloud Spanner DDL that produces a stream of
//! tokens, skipping whitespace and comments.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
