//! Canonical text for expression token runs.
//!
//! Expressions are not parsed into a tree. Their tokens are re-rendered
//! with fixed spacing so that formatting differences in the source do not
//! show up as schema changes.

use crate::ast::quote_identifier;
use crate::lexer::{Keyword, Token, TokenKind};

/// Renders a token run as canonical expression text.
pub(crate) fn render_tokens(tokens: &[Token], source: &str) -> String {
    let mut out = String::new();
    let mut prev: Option<&TokenKind> = None;
    let mut glue_next = false;

    for token in tokens {
        let kind = &token.kind;
        if let Some(prev_kind) = prev {
            if !glue_next && needs_space(prev_kind, kind) {
                out.push(' ');
            }
        }
        out.push_str(&token_text(token, source));
        glue_next = is_unary(kind, prev);
        prev = Some(kind);
    }
    out
}

fn token_text(token: &Token, source: &str) -> String {
    match &token.kind {
        TokenKind::Keyword(kw) if kw.is_reserved() => kw.as_str().to_string(),
        TokenKind::Keyword(_) => token.span.text(source).to_string(),
        TokenKind::Identifier(name) => {
            if token.span.text(source).starts_with('`') {
                quote_identifier(name)
            } else {
                name.clone()
            }
        }
        TokenKind::Integer(i) => i.to_string(),
        TokenKind::Float(_) => token.span.text(source).to_string(),
        TokenKind::String(s) => quote_string(s),
        TokenKind::Bytes(s) => format!("b{}", quote_string(s)),
        other => other.symbol().unwrap_or_default().to_string(),
    }
}

/// Renders a string literal with single quotes.
#[must_use]
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

const fn is_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::Concat
            | TokenKind::BitAnd
            | TokenKind::BitOr
            | TokenKind::BitXor
            | TokenKind::BitNot
            | TokenKind::LeftShift
            | TokenKind::RightShift
            | TokenKind::Arrow
    )
}

/// A sign or `~` is unary when nothing that ends an operand precedes it.
fn is_unary(kind: &TokenKind, prev: Option<&TokenKind>) -> bool {
    match kind {
        TokenKind::BitNot => true,
        TokenKind::Minus | TokenKind::Plus => match prev {
            None => true,
            Some(TokenKind::Keyword(kw)) => kw.is_reserved(),
            Some(p) => {
                is_operator(p)
                    || matches!(
                        p,
                        TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::Comma
                    )
            }
        },
        _ => false,
    }
}

/// Keywords after which `(` opens a sub-expression rather than an argument list.
const fn is_operator_keyword(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::And
            | Keyword::Or
            | Keyword::Not
            | Keyword::In
            | Keyword::Is
            | Keyword::As
            | Keyword::On
            | Keyword::By
            | Keyword::Where
            | Keyword::Exists
    )
}

fn needs_space(prev: &TokenKind, cur: &TokenKind) -> bool {
    if matches!(
        prev,
        TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::Dot | TokenKind::At
    ) {
        return false;
    }
    match cur {
        TokenKind::RightParen | TokenKind::RightBracket | TokenKind::Comma | TokenKind::Dot => {
            false
        }
        TokenKind::LeftParen => match prev {
            TokenKind::Identifier(_) => false,
            TokenKind::Keyword(kw) => is_operator_keyword(*kw),
            _ => true,
        },
        TokenKind::LeftBracket => !matches!(
            prev,
            TokenKind::Identifier(_) | TokenKind::RightParen | TokenKind::RightBracket
        ),
        _ => true,
    }
}
