//! Clauses shared by several DDL statements, and identifier rendering.

use core::fmt;
use std::collections::BTreeMap;

use crate::lexer::Keyword;

/// Returns true if `name` can be written without back-quotes.
#[must_use]
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !Keyword::from_str(name).is_some_and(|kw| kw.is_reserved())
}

/// Renders a single identifier, back-quoting it when required.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

/// Renders a possibly schema-qualified name (`sch.tbl`).
#[must_use]
pub fn quote_path(path: &str) -> String {
    path.split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

/// Renders a comma-separated list of names.
#[must_use]
pub fn quote_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote_path(n))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// An expression kept as canonical text.
///
/// Defaults, generation clauses, CHECK bodies, search index filters and
/// option values are not interpreted; the parser normalizes their tokens
/// (keyword case, spacing, literal quoting) so two spellings of the same
/// expression compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(String);

impl Expr {
    /// Wraps already-normalized expression text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the expression text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An `OPTIONS (key = value, ...)` clause, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionList {
    entries: Vec<(String, Expr)>,
}

impl OptionList {
    /// Creates an option list from `(key, value)` pairs.
    #[must_use]
    pub const fn new(entries: Vec<(String, Expr)>) -> Self {
        Self { entries }
    }

    /// Returns the `(key, value)` pairs in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[(String, Expr)] {
        &self.entries
    }

    /// Looks up an option value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Expr> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the options as a sorted key to value-text map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    /// Returns true if no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for OptionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .entries
            .iter()
            .map(|(k, v)| format!("{}={v}", quote_identifier(k)))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "OPTIONS ({body})")
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A column reference in a primary key, index key or ORDER BY list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPart {
    /// Column name.
    pub column: String,
    /// Sort direction; rendered explicitly even when defaulted.
    pub direction: OrderDirection,
}

impl KeyPart {
    /// Creates an ascending key part.
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Creates a descending key part.
    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Desc,
        }
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            quote_path(&self.column),
            self.direction.as_str()
        )
    }
}

/// Referential action for interleaved tables and foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// `ON DELETE CASCADE`
    Cascade,
    /// `ON DELETE NO ACTION`
    NoAction,
}

impl OnDelete {
    /// Returns the action keywords.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ON DELETE {}", self.as_str())
    }
}

/// Interleave clause of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInterleave {
    /// Parent table name.
    pub parent: String,
    /// `Some` for `INTERLEAVE IN PARENT` (the action defaults to
    /// `NO ACTION`), `None` for a plain `INTERLEAVE IN`.
    pub on_delete: Option<OnDelete>,
}

impl fmt::Display for TableInterleave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.on_delete {
            Some(action) => write!(
                f,
                "INTERLEAVE IN PARENT {} {action}",
                quote_path(&self.parent)
            ),
            None => write!(f, "INTERLEAVE IN {}", quote_path(&self.parent)),
        }
    }
}

/// A `FOREIGN KEY` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name, `None` when anonymous.
    pub name: Option<String>,
    /// Referencing columns of the owning table.
    pub columns: Vec<String>,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns.
    pub referenced_columns: Vec<String>,
    /// Optional referential action.
    pub on_delete: Option<OnDelete>,
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {} ", quote_path(name))?;
        }
        write!(
            f,
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            quote_list(&self.columns),
            quote_path(&self.referenced_table),
            quote_list(&self.referenced_columns)
        )?;
        if let Some(action) = self.on_delete {
            write!(f, " {action}")?;
        }
        Ok(())
    }
}

/// A `CHECK` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConstraint {
    /// Constraint name, `None` when anonymous.
    pub name: Option<String>,
    /// Boolean expression.
    pub expr: Expr,
}

impl fmt::Display for CheckConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {} ", quote_path(name))?;
        }
        write!(f, "CHECK ({})", self.expr)
    }
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraint {
    /// Foreign key.
    ForeignKey(ForeignKey),
    /// Check constraint.
    Check(CheckConstraint),
}

impl TableConstraint {
    /// Returns the constraint name, `None` when anonymous.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::ForeignKey(fk) => fk.name.as_deref(),
            Self::Check(check) => check.name.as_deref(),
        }
    }

    /// Returns the constraint kind as written in DDL.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ForeignKey(_) => "FOREIGN KEY",
            Self::Check(_) => "CHECK",
        }
    }
}

impl fmt::Display for TableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignKey(fk) => fk.fmt(f),
            Self::Check(check) => check.fmt(f),
        }
    }
}

/// `ROW DELETION POLICY (OLDER_THAN(column, INTERVAL n DAY))`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDeletionPolicy {
    /// Retention function, e.g. `OLDER_THAN`.
    pub function: String,
    /// Timestamp column the policy applies to.
    pub column: String,
    /// Retention interval in days.
    pub days: i64,
}

impl fmt::Display for RowDeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ROW DELETION POLICY ({}({}, INTERVAL {} DAY))",
            self.function,
            quote_path(&self.column),
            self.days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("col1"), "col1");
        assert_eq!(quote_identifier("Key"), "Key");
        assert_eq!(quote_identifier("Order"), "`Order`");
        assert_eq!(quote_identifier("my-db"), "`my-db`");
        assert_eq!(quote_path("sch.tbl"), "sch.tbl");
    }

    #[test]
    fn test_option_list() {
        let options = OptionList::new(vec![
            (String::from("retention_period"), Expr::new("'7d'")),
            (String::from("allow_commit_timestamp"), Expr::new("TRUE")),
        ]);
        assert_eq!(
            options.to_string(),
            "OPTIONS (retention_period='7d', allow_commit_timestamp=TRUE)"
        );
        assert_eq!(options.get("allow_commit_timestamp"), Some(&Expr::new("TRUE")));
        let keys: Vec<_> = options.to_map().into_keys().collect();
        assert_eq!(keys, vec!["allow_commit_timestamp", "retention_period"]);
    }

    #[test]
    fn test_interleave_rendering() {
        let parent = TableInterleave {
            parent: String::from("p"),
            on_delete: Some(OnDelete::NoAction),
        };
        assert_eq!(
            parent.to_string(),
            "INTERLEAVE IN PARENT p ON DELETE NO ACTION"
        );
        let plain = TableInterleave {
            parent: String::from("p"),
            on_delete: None,
        };
        assert_eq!(plain.to_string(), "INTERLEAVE IN p");
    }

    #[test]
    fn test_constraint_rendering() {
        let fk = TableConstraint::ForeignKey(ForeignKey {
            name: Some(String::from("fk")),
            columns: vec![String::from("a"), String::from("b")],
            referenced_table: String::from("t"),
            referenced_columns: vec![String::from("x"), String::from("y")],
            on_delete: Some(OnDelete::Cascade),
        });
        assert_eq!(
            fk.to_string(),
            "CONSTRAINT fk FOREIGN KEY (a, b) REFERENCES t (x, y) ON DELETE CASCADE"
        );
        assert_eq!(fk.name(), Some("fk"));

        let check = TableConstraint::Check(CheckConstraint {
            name: None,
            expr: Expr::new("a > 1"),
        });
        assert_eq!(check.to_string(), "CHECK (a > 1)");
        assert_eq!(check.kind(), "CHECK");
    }

    #[test]
    fn test_row_deletion_policy_rendering() {
        let policy = RowDeletionPolicy {
            function: String::from("OLDER_THAN"),
            column: String::from("created_at"),
            days: 30,
        };
        assert_eq!(
            policy.to_string(),
            "ROW DELETION POLICY (OLDER_THAN(created_at, INTERVAL 30 DAY))"
        );
    }
}
