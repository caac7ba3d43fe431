//! Token types for the DDL lexer.

use core::fmt;

use super::Span;

/// Keywords recognized by the DDL grammar.
///
/// Only the words the parser dispatches on are listed. Type names such as
/// `INT64` or `STRING` are plain identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Statement verbs
    Create,
    Alter,
    Drop,
    Add,
    Set,
    Replace,
    Rename,
    Grant,
    Revoke,
    Analyze,

    // Schema objects
    Table,
    Column,
    Index,
    Search,
    Change,
    Stream,
    Schema,
    Database,
    Locality,
    Group,
    View,
    Model,
    Sequence,
    Role,
    Function,
    Placement,
    Proto,
    Bundle,
    Statistics,

    // Table clauses
    Primary,
    Key,
    Foreign,
    References,
    Constraint,
    Check,
    Interleave,
    Parent,
    Row,
    Deletion,
    Policy,
    Interval,
    Day,
    Hidden,
    Stored,
    Storing,
    Options,
    Unique,
    NullFiltered,
    Partition,
    Delete,
    Cascade,
    Action,

    // Expressions and modifiers
    All,
    And,
    Array,
    As,
    Asc,
    By,
    Default,
    Desc,
    Exists,
    False,
    For,
    If,
    In,
    Is,
    No,
    Not,
    Null,
    On,
    Or,
    Order,
    True,
    Where,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let keyword = match s.to_ascii_uppercase().as_str() {
            "CREATE" => Self::Create,
            "ALTER" => Self::Alter,
            "DROP" => Self::Drop,
            "ADD" => Self::Add,
            "SET" => Self::Set,
            "REPLACE" => Self::Replace,
            "RENAME" => Self::Rename,
            "GRANT" => Self::Grant,
            "REVOKE" => Self::Revoke,
            "ANALYZE" => Self::Analyze,
            "TABLE" => Self::Table,
            "COLUMN" => Self::Column,
            "INDEX" => Self::Index,
            "SEARCH" => Self::Search,
            "CHANGE" => Self::Change,
            "STREAM" => Self::Stream,
            "SCHEMA" => Self::Schema,
            "DATABASE" => Self::Database,
            "LOCALITY" => Self::Locality,
            "GROUP" => Self::Group,
            "VIEW" => Self::View,
            "MODEL" => Self::Model,
            "SEQUENCE" => Self::Sequence,
            "ROLE" => Self::Role,
            "FUNCTION" => Self::Function,
            "PLACEMENT" => Self::Placement,
            "PROTO" => Self::Proto,
            "BUNDLE" => Self::Bundle,
            "STATISTICS" => Self::Statistics,
            "PRIMARY" => Self::Primary,
            "KEY" => Self::Key,
            "FOREIGN" => Self::Foreign,
            "REFERENCES" => Self::References,
            "CONSTRAINT" => Self::Constraint,
            "CHECK" => Self::Check,
            "INTERLEAVE" => Self::Interleave,
            "PARENT" => Self::Parent,
            "ROW" => Self::Row,
            "DELETION" => Self::Deletion,
            "POLICY" => Self::Policy,
            "INTERVAL" => Self::Interval,
            "DAY" => Self::Day,
            "HIDDEN" => Self::Hidden,
            "STORED" => Self::Stored,
            "STORING" => Self::Storing,
            "OPTIONS" => Self::Options,
            "UNIQUE" => Self::Unique,
            "NULL_FILTERED" => Self::NullFiltered,
            "PARTITION" => Self::Partition,
            "DELETE" => Self::Delete,
            "CASCADE" => Self::Cascade,
            "ACTION" => Self::Action,
            "ALL" => Self::All,
            "AND" => Self::And,
            "ARRAY" => Self::Array,
            "AS" => Self::As,
            "ASC" => Self::Asc,
            "BY" => Self::By,
            "DEFAULT" => Self::Default,
            "DESC" => Self::Desc,
            "EXISTS" => Self::Exists,
            "FALSE" => Self::False,
            "FOR" => Self::For,
            "IF" => Self::If,
            "IN" => Self::In,
            "IS" => Self::Is,
            "NO" => Self::No,
            "NOT" => Self::Not,
            "NULL" => Self::Null,
            "ON" => Self::On,
            "OR" => Self::Or,
            "ORDER" => Self::Order,
            "TRUE" => Self::True,
            "WHERE" => Self::Where,
            _ => return None,
        };
        Some(keyword)
    }

    /// Returns the keyword as an upper-case string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
            Self::Add => "ADD",
            Self::Set => "SET",
            Self::Replace => "REPLACE",
            Self::Rename => "RENAME",
            Self::Grant => "GRANT",
            Self::Revoke => "REVOKE",
            Self::Analyze => "ANALYZE",
            Self::Table => "TABLE",
            Self::Column => "COLUMN",
            Self::Index => "INDEX",
            Self::Search => "SEARCH",
            Self::Change => "CHANGE",
            Self::Stream => "STREAM",
            Self::Schema => "SCHEMA",
            Self::Database => "DATABASE",
            Self::Locality => "LOCALITY",
            Self::Group => "GROUP",
            Self::View => "VIEW",
            Self::Model => "MODEL",
            Self::Sequence => "SEQUENCE",
            Self::Role => "ROLE",
            Self::Function => "FUNCTION",
            Self::Placement => "PLACEMENT",
            Self::Proto => "PROTO",
            Self::Bundle => "BUNDLE",
            Self::Statistics => "STATISTICS",
            Self::Primary => "PRIMARY",
            Self::Key => "KEY",
            Self::Foreign => "FOREIGN",
            Self::References => "REFERENCES",
            Self::Constraint => "CONSTRAINT",
            Self::Check => "CHECK",
            Self::Interleave => "INTERLEAVE",
            Self::Parent => "PARENT",
            Self::Row => "ROW",
            Self::Deletion => "DELETION",
            Self::Policy => "POLICY",
            Self::Interval => "INTERVAL",
            Self::Day => "DAY",
            Self::Hidden => "HIDDEN",
            Self::Stored => "STORED",
            Self::Storing => "STORING",
            Self::Options => "OPTIONS",
            Self::Unique => "UNIQUE",
            Self::NullFiltered => "NULL_FILTERED",
            Self::Partition => "PARTITION",
            Self::Delete => "DELETE",
            Self::Cascade => "CASCADE",
            Self::Action => "ACTION",
            Self::All => "ALL",
            Self::And => "AND",
            Self::Array => "ARRAY",
            Self::As => "AS",
            Self::Asc => "ASC",
            Self::By => "BY",
            Self::Default => "DEFAULT",
            Self::Desc => "DESC",
            Self::Exists => "EXISTS",
            Self::False => "FALSE",
            Self::For => "FOR",
            Self::If => "IF",
            Self::In => "IN",
            Self::Is => "IS",
            Self::No => "NO",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::On => "ON",
            Self::Or => "OR",
            Self::Order => "ORDER",
            Self::True => "TRUE",
            Self::Where => "WHERE",
        }
    }

    /// Returns true for GoogleSQL reserved words.
    ///
    /// Reserved words can only be used as names when back-quoted; every
    /// other keyword doubles as an identifier.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::All
                | Self::And
                | Self::Array
                | Self::As
                | Self::Asc
                | Self::By
                | Self::Create
                | Self::Default
                | Self::Desc
                | Self::Exists
                | Self::False
                | Self::For
                | Self::Group
                | Self::If
                | Self::In
                | Self::Interval
                | Self::Is
                | Self::No
                | Self::Not
                | Self::Null
                | Self::On
                | Self::Or
                | Self::Order
                | Self::Partition
                | Self::Proto
                | Self::Set
                | Self::True
                | Self::Where
        )
    }
}

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal.
    Integer(i64),
    /// Floating-point literal.
    Float(f64),
    /// String literal (`'...'` or `"..."`), unescaped.
    String(String),
    /// Bytes literal (`b'...'`), unescaped.
    Bytes(String),

    // Identifiers and keywords
    /// Identifier, with back-quotes removed.
    Identifier(String),
    /// DDL keyword.
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ^
    BitXor,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// =>
    Arrow,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// @
    At,

    // Special
    /// End of input
    Eof,
    /// Invalid input, with a description.
    Error(String),
}

impl TokenKind {
    /// Returns the fixed spelling of an operator or delimiter token.
    #[must_use]
    pub const fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitNot => "~",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Arrow => "=>",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::At => "@",
            _ => return None,
        };
        Some(symbol)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "integer {i}"),
            Self::Float(x) => write!(f, "number {x}"),
            Self::String(s) => write!(f, "string '{s}'"),
            Self::Bytes(s) => write!(f, "bytes b'{s}'"),
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::Keyword(kw) => write!(f, "keyword {}", kw.as_str()),
            Self::Eof => f.write_str("end of input"),
            Self::Error(message) => f.write_str(message),
            other => write!(f, "'{}'", other.symbol().unwrap_or("?")),
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}
