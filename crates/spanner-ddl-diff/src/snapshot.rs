//! Normalized, keyed view of one DDL text.
//!
//! A [`SchemaSnapshot`] splits `CREATE TABLE` statements into their table,
//! constraint and row deletion policy parts so that each can be compared
//! on its own, and files every other object under its name.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;
use spanner_ddl_core::ast::{
    quote_path, AlterTableAction, ColumnDef, CreateChangeStream, CreateIndex, CreateLocalityGroup,
    CreateSchema, CreateSearchIndex, CreateTable, KeyPart, RowDeletionPolicy, Statement,
    TableConstraint, TableInterleave,
};
use tracing::debug;

use crate::error::{DiffError, Result};
use crate::options::DiffOptions;

/// Statement kinds skipped when proto bundles are ignored.
const PROTO_BUNDLE_KINDS: [&str; 2] = ["CREATE PROTO BUNDLE", "ALTER PROTO BUNDLE"];

/// A table without its constraints and row deletion policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns keyed by name, in declaration order.
    pub columns: IndexMap<String, ColumnDef>,
    /// Primary key parts.
    pub primary_key: Vec<KeyPart>,
    /// Interleave clause.
    pub interleave: Option<TableInterleave>,
}

impl Table {
    /// Renders the primary key clause.
    #[must_use]
    pub fn primary_key_clause(&self) -> String {
        let parts: Vec<String> = self.primary_key.iter().map(ToString::to_string).collect();
        format!("PRIMARY KEY ({})", parts.join(", "))
    }
}

impl From<&CreateTable> for Table {
    fn from(create: &CreateTable) -> Self {
        Self {
            name: create.name.clone(),
            columns: create
                .columns
                .iter()
                .map(|column| (column.name.clone(), column.clone()))
                .collect(),
            primary_key: create.primary_key.clone(),
            interleave: create.interleave.clone(),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self.columns.values().map(ToString::to_string).collect();
        write!(
            f,
            "CREATE TABLE {} ({}) {}",
            quote_path(&self.name),
            columns.join(", "),
            self.primary_key_clause()
        )?;
        if let Some(interleave) = &self.interleave {
            write!(f, ", {interleave}")?;
        }
        Ok(())
    }
}

/// A named constraint together with the table it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Owning table.
    pub table: String,
    /// The constraint definition.
    pub definition: TableConstraint,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ON {}", self.definition, quote_path(&self.table))
    }
}

/// Every object declared by one DDL text, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot {
    /// Tables in creation order.
    pub tables: IndexMap<String, Table>,
    /// Secondary indexes.
    pub indexes: IndexMap<String, CreateIndex>,
    /// Search indexes.
    pub search_indexes: IndexMap<String, CreateSearchIndex>,
    /// Foreign key and check constraints.
    pub constraints: IndexMap<String, Constraint>,
    /// Row deletion policies keyed by table name.
    pub row_deletion_policies: IndexMap<String, RowDeletionPolicy>,
    /// Change streams.
    pub change_streams: IndexMap<String, CreateChangeStream>,
    /// Named schemas.
    pub schemas: IndexMap<String, CreateSchema>,
    /// Locality groups keyed by their rendered name.
    pub locality_groups: IndexMap<String, CreateLocalityGroup>,
    /// Database options merged from every `ALTER DATABASE` statement.
    pub database_options: BTreeMap<String, String>,
    /// Distinct database ids named by `ALTER DATABASE`, in first-seen order.
    pub database_ids: Vec<String>,
}

impl SchemaSnapshot {
    /// Builds a snapshot from parsed statements.
    ///
    /// # Errors
    ///
    /// Fails on the first statement outside the diffable subset, on an
    /// anonymous constraint, or on a duplicate object name.
    pub fn build(statements: &[Statement], options: &DiffOptions) -> Result<Self> {
        let mut snapshot = Self::default();
        for statement in statements {
            snapshot.add_statement(statement, options)?;
        }
        debug!(
            tables = snapshot.tables.len(),
            indexes = snapshot.indexes.len(),
            search_indexes = snapshot.search_indexes.len(),
            constraints = snapshot.constraints.len(),
            change_streams = snapshot.change_streams.len(),
            "Built schema snapshot"
        );
        Ok(snapshot)
    }

    /// Returns the single database id this snapshot names, if any.
    ///
    /// # Errors
    ///
    /// Returns `MultipleDatabaseIds` when more than one id is named.
    pub fn database_id(&self) -> Result<Option<&str>> {
        match self.database_ids.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(id.as_str())),
            _ => Err(DiffError::MultipleDatabaseIds),
        }
    }

    fn add_statement(&mut self, statement: &Statement, options: &DiffOptions) -> Result<()> {
        match statement {
            Statement::CreateTable(create) => self.add_table(create, statement),
            Statement::CreateIndex(index) => {
                insert_unique(&mut self.indexes, "index", &index.name, index.clone())
            }
            Statement::CreateSearchIndex(index) => insert_unique(
                &mut self.search_indexes,
                "search index",
                &index.name,
                index.clone(),
            ),
            Statement::CreateChangeStream(stream) => insert_unique(
                &mut self.change_streams,
                "change stream",
                &stream.name,
                stream.clone(),
            ),
            Statement::CreateSchema(schema) => {
                insert_unique(&mut self.schemas, "schema", &schema.name, schema.clone())
            }
            Statement::CreateLocalityGroup(group) => insert_unique(
                &mut self.locality_groups,
                "locality group",
                &group.display_name(),
                group.clone(),
            ),
            Statement::AlterTable(alter) => match &alter.action {
                AlterTableAction::AddConstraint(constraint) => {
                    self.add_constraint(&alter.table, constraint, statement)
                }
                AlterTableAction::AddRowDeletionPolicy(policy) => {
                    self.add_row_deletion_policy(&alter.table, policy)
                }
                AlterTableAction::Other(_) => Err(DiffError::UnsupportedAlterTable {
                    statement: statement.to_string(),
                }),
            },
            Statement::AlterDatabase(alter) => {
                if !self.database_ids.contains(&alter.name) {
                    self.database_ids.push(alter.name.clone());
                }
                self.database_options.extend(alter.options.to_map());
                Ok(())
            }
            Statement::Unsupported(unsupported) => {
                if options.ignore_proto_bundles
                    && PROTO_BUNDLE_KINDS.contains(&unsupported.kind.as_str())
                {
                    debug!(kind = %unsupported.kind, "Skipping proto bundle statement");
                    return Ok(());
                }
                Err(DiffError::Unsupported {
                    statement: unsupported.text.clone(),
                })
            }
        }
    }

    fn add_table(&mut self, create: &CreateTable, statement: &Statement) -> Result<()> {
        insert_unique(&mut self.tables, "table", &create.name, Table::from(create))?;
        for constraint in &create.constraints {
            self.add_constraint(&create.name, constraint, statement)?;
        }
        if let Some(policy) = &create.row_deletion_policy {
            self.add_row_deletion_policy(&create.name, policy)?;
        }
        Ok(())
    }

    fn add_constraint(
        &mut self,
        table: &str,
        constraint: &TableConstraint,
        statement: &Statement,
    ) -> Result<()> {
        let Some(name) = constraint.name() else {
            return Err(DiffError::AnonymousConstraint {
                statement: statement.to_string(),
                kind: constraint.kind(),
            });
        };
        insert_unique(
            &mut self.constraints,
            "constraint",
            name,
            Constraint {
                table: table.to_string(),
                definition: constraint.clone(),
            },
        )
    }

    fn add_row_deletion_policy(&mut self, table: &str, policy: &RowDeletionPolicy) -> Result<()> {
        insert_unique(
            &mut self.row_deletion_policies,
            "row deletion policy on table",
            table,
            policy.clone(),
        )
    }
}

fn insert_unique<V>(
    map: &mut IndexMap<String, V>,
    kind: &'static str,
    name: &str,
    value: V,
) -> Result<()> {
    match map.entry(name.to_string()) {
        Entry::Occupied(_) => Err(DiffError::Duplicate {
            kind,
            name: name.to_string(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}
