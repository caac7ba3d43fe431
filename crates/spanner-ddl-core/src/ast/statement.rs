//! DDL statement AST types.
//!
//! `Display` on every statement is its canonical rendering. `IF NOT EXISTS`
//! is parsed but never rendered, so two definitions that differ only in
//! the guard render identically.

use core::fmt;

use super::clause::{
    join_display, quote_list, quote_path, Expr, KeyPart, OptionList, RowDeletionPolicy,
    TableConstraint, TableInterleave,
};
use super::types::ColumnDef;

/// `CREATE TABLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    /// `IF NOT EXISTS`
    pub if_not_exists: bool,
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Constraints declared inside the column list.
    pub constraints: Vec<TableConstraint>,
    /// Primary key parts.
    pub primary_key: Vec<KeyPart>,
    /// Interleave clause.
    pub interleave: Option<TableInterleave>,
    /// Row deletion policy clause.
    pub row_deletion_policy: Option<RowDeletionPolicy>,
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut elements: Vec<String> = self.columns.iter().map(ToString::to_string).collect();
        elements.extend(self.constraints.iter().map(ToString::to_string));
        write!(
            f,
            "CREATE TABLE {} ({}) PRIMARY KEY ({})",
            quote_path(&self.name),
            elements.join(", "),
            join_display(&self.primary_key)
        )?;
        if let Some(interleave) = &self.interleave {
            write!(f, ", {interleave}")?;
        }
        if let Some(policy) = &self.row_deletion_policy {
            write!(f, ", {policy}")?;
        }
        Ok(())
    }
}

/// `CREATE [UNIQUE] [NULL_FILTERED] INDEX`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndex {
    /// `UNIQUE`
    pub unique: bool,
    /// `NULL_FILTERED`
    pub null_filtered: bool,
    /// `IF NOT EXISTS`
    pub if_not_exists: bool,
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table: String,
    /// Key parts.
    pub key_parts: Vec<KeyPart>,
    /// `STORING` columns.
    pub storing: Vec<String>,
    /// `INTERLEAVE IN` table.
    pub interleave_in: Option<String>,
}

impl CreateIndex {
    /// Renders the index with its `STORING` clause omitted.
    #[must_use]
    pub fn to_sql_without_storing(&self) -> String {
        let mut sql = String::new();
        // Writing into a String cannot fail.
        let _ = self.render(&mut sql, false);
        sql
    }

    fn render(&self, out: &mut impl fmt::Write, with_storing: bool) -> fmt::Result {
        out.write_str("CREATE ")?;
        if self.unique {
            out.write_str("UNIQUE ")?;
        }
        if self.null_filtered {
            out.write_str("NULL_FILTERED ")?;
        }
        write!(
            out,
            "INDEX {} ON {} ({})",
            quote_path(&self.name),
            quote_path(&self.table),
            join_display(&self.key_parts)
        )?;
        if with_storing && !self.storing.is_empty() {
            write!(out, " STORING ({})", quote_list(&self.storing))?;
        }
        if let Some(parent) = &self.interleave_in {
            write!(out, ", INTERLEAVE IN {}", quote_path(parent))?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, true)
    }
}

/// `CREATE SEARCH INDEX`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSearchIndex {
    /// `IF NOT EXISTS`
    pub if_not_exists: bool,
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table: String,
    /// `TOKENLIST` columns.
    pub token_columns: Vec<String>,
    /// `STORING` columns.
    pub storing: Vec<String>,
    /// `PARTITION BY` columns.
    pub partition_by: Vec<String>,
    /// `ORDER BY` key parts.
    pub order_by: Vec<KeyPart>,
    /// `WHERE` filter.
    pub filter: Option<Expr>,
    /// `INTERLEAVE IN` table.
    pub interleave_in: Option<String>,
    /// Index options.
    pub options: Option<OptionList>,
}

impl CreateSearchIndex {
    /// `PARTITION BY ...`, if present.
    #[must_use]
    pub fn partition_by_clause(&self) -> Option<String> {
        (!self.partition_by.is_empty())
            .then(|| format!("PARTITION BY {}", quote_list(&self.partition_by)))
    }

    /// `ORDER BY ...`, if present.
    #[must_use]
    pub fn order_by_clause(&self) -> Option<String> {
        (!self.order_by.is_empty()).then(|| format!("ORDER BY {}", join_display(&self.order_by)))
    }

    /// `WHERE ...`, if present.
    #[must_use]
    pub fn where_clause(&self) -> Option<String> {
        self.filter.as_ref().map(|expr| format!("WHERE {expr}"))
    }

    /// `INTERLEAVE IN ...`, if present.
    #[must_use]
    pub fn interleave_clause(&self) -> Option<String> {
        self.interleave_in
            .as_ref()
            .map(|parent| format!("INTERLEAVE IN {}", quote_path(parent)))
    }

    /// `OPTIONS (...)`, if present.
    #[must_use]
    pub fn options_clause(&self) -> Option<String> {
        self.options.as_ref().map(ToString::to_string)
    }
}

impl fmt::Display for CreateSearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE SEARCH INDEX {} ON {} ({})",
            quote_path(&self.name),
            quote_path(&self.table),
            quote_list(&self.token_columns)
        )?;
        if !self.storing.is_empty() {
            write!(f, " STORING ({})", quote_list(&self.storing))?;
        }
        for clause in [
            self.partition_by_clause(),
            self.order_by_clause(),
            self.where_clause(),
        ]
        .into_iter()
        .flatten()
        {
            write!(f, " {clause}")?;
        }
        if let Some(interleave) = self.interleave_clause() {
            write!(f, ", {interleave}")?;
        }
        if let Some(options) = &self.options {
            write!(f, " {options}")?;
        }
        Ok(())
    }
}

/// A table tracked by a change stream, with optional column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedTable {
    /// Table name.
    pub table: String,
    /// Tracked columns; `None` tracks every column.
    pub columns: Option<Vec<String>>,
}

impl fmt::Display for TrackedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_path(&self.table))?;
        if let Some(columns) = &self.columns {
            write!(f, "({})", quote_list(columns))?;
        }
        Ok(())
    }
}

/// The `FOR` clause of a change stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStreamFor {
    /// `FOR ALL`
    All,
    /// `FOR t1, t2(c1, c2)`
    Tables(Vec<TrackedTable>),
}

impl fmt::Display for ChangeStreamFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("FOR ALL"),
            Self::Tables(tables) => write!(f, "FOR {}", join_display(tables)),
        }
    }
}

/// `CREATE CHANGE STREAM`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChangeStream {
    /// Stream name.
    pub name: String,
    /// Watched tables; `None` watches nothing until altered.
    pub for_clause: Option<ChangeStreamFor>,
    /// Stream options.
    pub options: Option<OptionList>,
}

impl fmt::Display for CreateChangeStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE CHANGE STREAM {}", quote_path(&self.name))?;
        if let Some(for_clause) = &self.for_clause {
            write!(f, " {for_clause}")?;
        }
        if let Some(options) = &self.options {
            write!(f, " {options}")?;
        }
        Ok(())
    }
}

/// `CREATE SCHEMA`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSchema {
    /// `IF NOT EXISTS`
    pub if_not_exists: bool,
    /// Schema name.
    pub name: String,
    /// Schema options.
    pub options: Option<OptionList>,
}

impl fmt::Display for CreateSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE SCHEMA {}", quote_path(&self.name))?;
        if let Some(options) = &self.options {
            write!(f, " {options}")?;
        }
        Ok(())
    }
}

/// `CREATE LOCALITY GROUP`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLocalityGroup {
    /// `IF NOT EXISTS`
    pub if_not_exists: bool,
    /// Group name; `None` is the database's `DEFAULT` group.
    pub name: Option<String>,
    /// Storage options.
    pub options: Option<OptionList>,
}

impl CreateLocalityGroup {
    /// Returns the group name as written in DDL.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map_or_else(|| String::from("DEFAULT"), quote_path)
    }

    /// Returns true for the `DEFAULT` group.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.name.is_none()
    }
}

impl fmt::Display for CreateLocalityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE LOCALITY GROUP {}", self.display_name())?;
        if let Some(options) = &self.options {
            write!(f, " {options}")?;
        }
        Ok(())
    }
}

/// Action of an `ALTER TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableAction {
    /// `ADD [CONSTRAINT n] FOREIGN KEY ...` or `ADD [CONSTRAINT n] CHECK (...)`
    AddConstraint(TableConstraint),
    /// `ADD ROW DELETION POLICY (...)`
    AddRowDeletionPolicy(RowDeletionPolicy),
    /// Any other action, kept as canonical text.
    Other(String),
}

impl fmt::Display for AlterTableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddConstraint(constraint) => write!(f, "ADD {constraint}"),
            Self::AddRowDeletionPolicy(policy) => write!(f, "ADD {policy}"),
            Self::Other(text) => f.write_str(text),
        }
    }
}

/// `ALTER TABLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTable {
    /// Target table.
    pub table: String,
    /// Requested action.
    pub action: AlterTableAction,
}

impl fmt::Display for AlterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALTER TABLE {} {}", quote_path(&self.table), self.action)
    }
}

/// `ALTER DATABASE db SET OPTIONS (...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterDatabase {
    /// Database id.
    pub name: String,
    /// Options being set.
    pub options: OptionList,
}

impl fmt::Display for AlterDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ALTER DATABASE {} SET {}",
            quote_path(&self.name),
            self.options
        )
    }
}

/// A recognized statement the diff engine cannot handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedStatement {
    /// Statement kind, e.g. `DROP` or `CREATE VIEW`.
    pub kind: String,
    /// Statement source text.
    pub text: String,
}

/// A top-level DDL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `CREATE TABLE`
    CreateTable(CreateTable),
    /// `CREATE INDEX`
    CreateIndex(CreateIndex),
    /// `CREATE SEARCH INDEX`
    CreateSearchIndex(CreateSearchIndex),
    /// `CREATE CHANGE STREAM`
    CreateChangeStream(CreateChangeStream),
    /// `CREATE SCHEMA`
    CreateSchema(CreateSchema),
    /// `CREATE LOCALITY GROUP`
    CreateLocalityGroup(CreateLocalityGroup),
    /// `ALTER TABLE`
    AlterTable(AlterTable),
    /// `ALTER DATABASE`
    AlterDatabase(AlterDatabase),
    /// A statement outside the diffable subset.
    Unsupported(UnsupportedStatement),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable(s) => s.fmt(f),
            Self::CreateIndex(s) => s.fmt(f),
            Self::CreateSearchIndex(s) => s.fmt(f),
            Self::CreateChangeStream(s) => s.fmt(f),
            Self::CreateSchema(s) => s.fmt(f),
            Self::CreateLocalityGroup(s) => s.fmt(f),
            Self::AlterTable(s) => s.fmt(f),
            Self::AlterDatabase(s) => s.fmt(f),
            Self::Unsupported(s) => f.write_str(&s.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnType, OnDelete, TypeLength};

    fn index() -> CreateIndex {
        CreateIndex {
            unique: true,
            null_filtered: true,
            if_not_exists: true,
            name: String::from("i"),
            table: String::from("t"),
            key_parts: vec![KeyPart::asc("c1"), KeyPart::desc("c2")],
            storing: vec![String::from("c4"), String::from("c5")],
            interleave_in: Some(String::from("other")),
        }
    }

    #[test]
    fn test_create_table_rendering() {
        let mut col2 = ColumnDef::new(
            "col2",
            ColumnType::Sized {
                name: String::from("STRING"),
                length: TypeLength::Max,
            },
        )
        .not_null();
        col2.options = Some(OptionList::new(vec![(
            String::from("allow_commit_timestamp"),
            Expr::new("TRUE"),
        )]));
        let table = CreateTable {
            if_not_exists: true,
            name: String::from("test1"),
            columns: vec![ColumnDef::new("col1", ColumnType::scalar("INT64")), col2],
            constraints: vec![],
            primary_key: vec![KeyPart::asc("col1")],
            interleave: Some(TableInterleave {
                parent: String::from("p"),
                on_delete: Some(OnDelete::NoAction),
            }),
            row_deletion_policy: None,
        };
        assert_eq!(
            table.to_string(),
            "CREATE TABLE test1 (col1 INT64, col2 STRING(MAX) NOT NULL \
             OPTIONS (allow_commit_timestamp=TRUE)) PRIMARY KEY (col1 ASC), \
             INTERLEAVE IN PARENT p ON DELETE NO ACTION"
        );
    }

    #[test]
    fn test_create_index_rendering() {
        let index = index();
        assert_eq!(
            index.to_string(),
            "CREATE UNIQUE NULL_FILTERED INDEX i ON t (c1 ASC, c2 DESC) \
             STORING (c4, c5), INTERLEAVE IN other"
        );
        assert_eq!(
            index.to_sql_without_storing(),
            "CREATE UNIQUE NULL_FILTERED INDEX i ON t (c1 ASC, c2 DESC), INTERLEAVE IN other"
        );
    }

    #[test]
    fn test_search_index_clauses() {
        let search = CreateSearchIndex {
            if_not_exists: false,
            name: String::from("s"),
            table: String::from("albums"),
            token_columns: vec![String::from("title_tokens")],
            storing: vec![String::from("genre")],
            partition_by: vec![String::from("singer_id")],
            order_by: vec![KeyPart::desc("release")],
            filter: Some(Expr::new("genre IS NOT NULL")),
            interleave_in: Some(String::from("singers")),
            options: Some(OptionList::new(vec![(
                String::from("sort_order_sharding"),
                Expr::new("TRUE"),
            )])),
        };
        assert_eq!(
            search.to_string(),
            "CREATE SEARCH INDEX s ON albums (title_tokens) STORING (genre) \
             PARTITION BY singer_id ORDER BY release DESC WHERE genre IS NOT NULL, \
             INTERLEAVE IN singers OPTIONS (sort_order_sharding=TRUE)"
        );
        assert_eq!(search.where_clause().as_deref(), Some("WHERE genre IS NOT NULL"));
    }

    #[test]
    fn test_change_stream_rendering() {
        let stream = CreateChangeStream {
            name: String::from("cs"),
            for_clause: Some(ChangeStreamFor::Tables(vec![
                TrackedTable {
                    table: String::from("t1"),
                    columns: None,
                },
                TrackedTable {
                    table: String::from("t2"),
                    columns: Some(vec![String::from("c1"), String::from("c2")]),
                },
            ])),
            options: None,
        };
        assert_eq!(
            stream.to_string(),
            "CREATE CHANGE STREAM cs FOR t1, t2(c1, c2)"
        );
    }

    #[test]
    fn test_locality_group_rendering() {
        let default_group = CreateLocalityGroup {
            if_not_exists: false,
            name: None,
            options: None,
        };
        assert_eq!(default_group.to_string(), "CREATE LOCALITY GROUP DEFAULT");
        assert!(default_group.is_default());
    }
}
