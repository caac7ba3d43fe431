//! Statement generation between two schema snapshots.
//!
//! [`DdlDiff::generate_statements`] emits statements in a fixed order so
//! that nothing is referenced before it is created or after it is
//! dropped:
//!
//! 1. database options
//! 2. drops of removed indexes, change streams and search indexes
//! 3. drops of indexes that must be recreated
//! 4. drops of removed and changed constraints
//! 5. drops of removed row deletion policies
//! 6. search index column drops
//! 7. drops of removed tables, in reverse creation order
//! 8. drops of removed schemas
//! 9. new and changed locality groups, alterations of changed tables,
//!    then drops of removed locality groups
//! 10. new schemas
//! 11. new tables, in creation order
//! 12. new and changed row deletion policies
//! 13. new indexes
//! 14. changed indexes
//! 15. new and changed constraints
//! 16. new and changed change streams
//! 17. new search indexes and search index column additions

use indexmap::IndexMap;
use spanner_ddl_core::ast::{
    quote_path, CreateChangeStream, CreateIndex, CreateLocalityGroup, CreateSchema,
    CreateSearchIndex, RowDeletionPolicy,
};
use tracing::{debug, info, warn};

use crate::difference::{
    diff_maps, diff_rendered, option_list_delta, options_delta, MapDifference, ValueDifference,
};
use crate::error::{DdlSide, DiffError, Result};
use crate::options::DiffOptions;
use crate::search_index::{search_index_updates, SearchIndexUpdates};
use crate::snapshot::{Constraint, SchemaSnapshot, Table};
use crate::table::alter_table_statements;

/// Two schema snapshots ready to be diffed.
#[derive(Debug, Clone)]
pub struct DdlDiff {
    original: SchemaSnapshot,
    new: SchemaSnapshot,
    database_id: Option<String>,
}

impl DdlDiff {
    /// Parses both DDL texts and builds their snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if either text fails to parse or contains a
    /// statement that cannot be diffed, or if the database ids conflict.
    pub fn build(original_ddl: &str, new_ddl: &str, options: &DiffOptions) -> Result<Self> {
        let original = parse_snapshot(DdlSide::Original, original_ddl, options)?;
        let new = parse_snapshot(DdlSide::New, new_ddl, options)?;
        Self::from_snapshots(original, new)
    }

    /// Pairs two snapshots, resolving the database id.
    ///
    /// # Errors
    ///
    /// Returns an error if a side names more than one database, or the two
    /// sides name different databases.
    pub fn from_snapshots(original: SchemaSnapshot, new: SchemaSnapshot) -> Result<Self> {
        let database_id = match (original.database_id()?, new.database_id()?) {
            (Some(old_id), Some(new_id)) if old_id != new_id => {
                return Err(DiffError::DatabaseIdMismatch)
            }
            (_, Some(id)) | (Some(id), None) => Some(id.to_string()),
            (None, None) => None,
        };
        Ok(Self {
            original,
            new,
            database_id,
        })
    }

    /// Returns the resolved database id.
    #[must_use]
    pub fn database_id(&self) -> Option<&str> {
        self.database_id.as_deref()
    }

    /// Returns the original snapshot.
    #[must_use]
    pub const fn original(&self) -> &SchemaSnapshot {
        &self.original
    }

    /// Returns the new snapshot.
    #[must_use]
    pub const fn new_snapshot(&self) -> &SchemaSnapshot {
        &self.new
    }

    /// Generates the statements migrating the original schema to the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if a change is not permitted by `options` or has no
    /// in-place form. No statements are returned in that case.
    pub fn generate_statements(&self, options: &DiffOptions) -> Result<Vec<String>> {
        let diff = Differences::new(&self.original, &self.new);
        self.check_preconditions(&diff, options)?;

        let mut search_index_changes = SearchIndexUpdates::default();
        for change in &diff.search_indexes.changed {
            search_index_changes.extend(search_index_updates(change.old, change.new, options)?);
        }

        let mut out = Vec::new();
        self.database_statements(&mut out);
        drop_removed_objects(&diff, options, &mut out);
        drop_changed_objects(&diff, options, &mut out);
        out.extend(search_index_changes.drops);
        self.drop_tables_and_schemas(&diff, options, &mut out);

        create_locality_groups(&diff, &mut out);
        for change in &diff.tables.changed {
            info!(table = %change.key, "Altering modified table");
            out.extend(alter_table_statements(change.old, change.new, options)?);
        }
        drop_locality_groups(&diff, options, &mut out);

        for (name, schema) in &diff.schemas.added {
            info!(schema = %name, "Creating schema");
            out.push(schema.to_string());
        }
        self.create_tables_and_policies(&diff, &mut out);
        create_indexes_and_constraints(&diff, &mut out);
        update_change_streams(&diff, &mut out);

        for (name, index) in &diff.search_indexes.added {
            info!(search_index = %name, "Creating new search index");
            out.push(index.to_string());
        }
        out.extend(search_index_changes.creates);

        debug!(count = out.len(), "Generated statements");
        Ok(out)
    }

    fn check_preconditions(&self, diff: &Differences<'_>, options: &DiffOptions) -> Result<()> {
        if !diff.recreated_indexes().is_empty() && !options.allow_recreate_indexes {
            return Err(DiffError::IndexRecreateNotAllowed(keys(&diff.indexes.changed)));
        }
        if !diff.constraints.changed.is_empty() && !options.allow_recreate_constraints {
            return Err(DiffError::ConstraintRecreateNotAllowed(keys(&diff.constraints.changed)));
        }
        if !diff.schemas.changed.is_empty() {
            return Err(DiffError::SchemaChanged(keys(&diff.schemas.changed)));
        }
        let has_option_changes =
            options_delta(&self.original.database_options, &self.new.database_options).is_some();
        if has_option_changes && self.database_id.as_deref().map_or(true, str::is_empty) {
            return Err(DiffError::MissingDatabaseId);
        }
        Ok(())
    }

    fn database_statements(&self, out: &mut Vec<String>) {
        let delta = options_delta(&self.original.database_options, &self.new.database_options);
        if let (Some(delta), Some(id)) = (delta, &self.database_id) {
            info!(database = %id, "Updating database options");
            out.push(format!(
                "ALTER DATABASE {} SET OPTIONS ({delta})",
                quote_path(id)
            ));
        }
    }

    fn drop_tables_and_schemas(
        &self,
        diff: &Differences<'_>,
        options: &DiffOptions,
        out: &mut Vec<String>,
    ) {
        if !options.allow_drop_statements {
            skipped(&diff.tables.removed, "table");
            skipped(&diff.schemas.removed, "schema");
            return;
        }
        for name in self.original.tables.keys().rev() {
            if !self.new.tables.contains_key(name) {
                info!(table = %name, "Dropping deleted table");
                out.push(format!("DROP TABLE {}", quote_path(name)));
            }
        }
        for (name, _) in &diff.schemas.removed {
            info!(schema = %name, "Dropping schema");
            out.push(format!("DROP SCHEMA {}", quote_path(name)));
        }
    }

    fn create_tables_and_policies(&self, diff: &Differences<'_>, out: &mut Vec<String>) {
        for (name, table) in &self.new.tables {
            if !self.original.tables.contains_key(name) {
                info!(table = %name, "Creating new table");
                out.push(table.to_string());
            }
        }
        for (table, policy) in &diff.policies.added {
            info!(table = %table, "Adding row deletion policy");
            out.push(format!("ALTER TABLE {} ADD {policy}", quote_path(table)));
        }
        for change in &diff.policies.changed {
            info!(table = %change.key, "Replacing row deletion policy");
            out.push(format!(
                "ALTER TABLE {} REPLACE {}",
                quote_path(change.key),
                change.new
            ));
        }
    }
}

/// Per-kind differences between two snapshots.
struct Differences<'a> {
    tables: MapDifference<'a, String, Table>,
    indexes: MapDifference<'a, String, CreateIndex>,
    search_indexes: MapDifference<'a, String, CreateSearchIndex>,
    constraints: MapDifference<'a, String, Constraint>,
    policies: MapDifference<'a, String, RowDeletionPolicy>,
    change_streams: MapDifference<'a, String, CreateChangeStream>,
    schemas: MapDifference<'a, String, CreateSchema>,
    locality_groups: MapDifference<'a, String, CreateLocalityGroup>,
}

impl<'a> Differences<'a> {
    fn new(original: &'a SchemaSnapshot, new: &'a SchemaSnapshot) -> Self {
        Self {
            tables: diff_rendered(&original.tables, &new.tables),
            indexes: diff_rendered(&original.indexes, &new.indexes),
            search_indexes: diff_rendered(&original.search_indexes, &new.search_indexes),
            constraints: diff_rendered(&original.constraints, &new.constraints),
            policies: diff_rendered(&original.row_deletion_policies, &new.row_deletion_policies),
            change_streams: diff_rendered(&original.change_streams, &new.change_streams),
            schemas: diff_rendered(&original.schemas, &new.schemas),
            locality_groups: diff_rendered(&original.locality_groups, &new.locality_groups),
        }
    }

    /// Changed indexes that differ in more than their STORING clause.
    fn recreated_indexes(&self) -> Vec<&'a CreateIndex> {
        self.indexes
            .changed
            .iter()
            .filter(|change| !storing_only(change.old, change.new))
            .map(|change| change.new)
            .collect()
    }
}

fn storing_only(old: &CreateIndex, new: &CreateIndex) -> bool {
    old.to_sql_without_storing() == new.to_sql_without_storing()
}

fn keys<V>(changed: &[ValueDifference<'_, String, V>]) -> Vec<String> {
    changed.iter().map(|change| change.key.to_string()).collect()
}

fn skipped<V>(removed: &[(&String, &V)], kind: &str) {
    for (name, _) in removed {
        warn!(kind, name = %name, "Skipping drop of removed object");
    }
}

fn parse_snapshot(side: DdlSide, ddl: &str, options: &DiffOptions) -> Result<SchemaSnapshot> {
    let statements =
        spanner_ddl_core::parse_ddl(ddl).map_err(|err| DiffError::parse(side, ddl, err))?;
    debug!(%side, statements = statements.len(), "Parsed DDL");
    SchemaSnapshot::build(&statements, options)
}

fn drop_removed_objects(diff: &Differences<'_>, options: &DiffOptions, out: &mut Vec<String>) {
    if !options.allow_drop_statements {
        skipped(&diff.indexes.removed, "index");
        skipped(&diff.change_streams.removed, "change stream");
        skipped(&diff.search_indexes.removed, "search index");
        return;
    }
    for (name, _) in &diff.indexes.removed {
        info!(index = %name, "Dropping deleted index");
        out.push(format!("DROP INDEX {}", quote_path(name)));
    }
    for (name, _) in &diff.change_streams.removed {
        info!(change_stream = %name, "Dropping deleted change stream");
        out.push(format!("DROP CHANGE STREAM {}", quote_path(name)));
    }
    for (name, _) in &diff.search_indexes.removed {
        info!(search_index = %name, "Dropping deleted search index");
        out.push(format!("DROP SEARCH INDEX {}", quote_path(name)));
    }
}

fn drop_changed_objects(diff: &Differences<'_>, options: &DiffOptions, out: &mut Vec<String>) {
    for index in diff.recreated_indexes() {
        info!(index = %index.name, "Dropping changed index for re-creation");
        out.push(format!("DROP INDEX {}", quote_path(&index.name)));
    }

    for (name, constraint) in &diff.constraints.removed {
        info!(constraint = %name, "Dropping constraint");
        out.push(drop_constraint(name, constraint));
    }
    for change in &diff.constraints.changed {
        info!(constraint = %change.key, "Dropping changed constraint for re-creation");
        out.push(drop_constraint(change.key, change.old));
    }

    if options.allow_drop_statements {
        for (table, _) in &diff.policies.removed {
            info!(table = %table, "Dropping row deletion policy");
            out.push(format!(
                "ALTER TABLE {} DROP ROW DELETION POLICY",
                quote_path(table)
            ));
        }
    } else {
        skipped(&diff.policies.removed, "row deletion policy");
    }
}

fn drop_constraint(name: &str, constraint: &Constraint) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {}",
        quote_path(&constraint.table),
        quote_path(name)
    )
}

// Column options may name a group, so groups exist before ALTER TABLE runs.
fn create_locality_groups(diff: &Differences<'_>, out: &mut Vec<String>) {
    for (name, group) in &diff.locality_groups.added {
        info!(locality_group = %name, "Creating locality group");
        if group.is_default() {
            // The DEFAULT group always exists and can only be altered.
            if let Some(delta) = option_list_delta(None, group.options.as_ref()) {
                out.push(format!("ALTER LOCALITY GROUP {name} SET OPTIONS ({delta})"));
            }
        } else {
            out.push(group.to_string());
        }
    }
    for change in &diff.locality_groups.changed {
        if let Some(delta) =
            option_list_delta(change.old.options.as_ref(), change.new.options.as_ref())
        {
            info!(locality_group = %change.key, "Updating locality group options");
            out.push(format!(
                "ALTER LOCALITY GROUP {} SET OPTIONS ({delta})",
                change.key
            ));
        }
    }
}

fn drop_locality_groups(diff: &Differences<'_>, options: &DiffOptions, out: &mut Vec<String>) {
    for (name, group) in &diff.locality_groups.removed {
        if group.is_default() {
            warn!("The DEFAULT locality group cannot be dropped");
        } else if options.allow_drop_statements {
            info!(locality_group = %name, "Dropping locality group");
            out.push(format!("DROP LOCALITY GROUP {name}"));
        } else {
            warn!(kind = "locality group", name = %name, "Skipping drop of removed object");
        }
    }
}

fn create_indexes_and_constraints(diff: &Differences<'_>, out: &mut Vec<String>) {
    for (name, index) in &diff.indexes.added {
        info!(index = %name, "Creating new index");
        out.push(index.to_string());
    }

    for change in &diff.indexes.changed {
        if storing_only(change.old, change.new) {
            info!(index = %change.key, "Updating STORING clause on index");
            let name = quote_path(change.key);
            let old_columns: IndexMap<&String, ()> =
                change.old.storing.iter().map(|c| (c, ())).collect();
            let new_columns: IndexMap<&String, ()> =
                change.new.storing.iter().map(|c| (c, ())).collect();
            let columns = diff_maps(&old_columns, &new_columns, |_, _| true);
            for (column, _) in &columns.removed {
                out.push(format!(
                    "ALTER INDEX {name} DROP STORED COLUMN {}",
                    quote_path(column)
                ));
            }
            for (column, _) in &columns.added {
                out.push(format!(
                    "ALTER INDEX {name} ADD STORED COLUMN {}",
                    quote_path(column)
                ));
            }
        } else {
            info!(index = %change.key, "Re-creating changed index");
            out.push(change.new.to_string());
        }
    }

    for (name, constraint) in &diff.constraints.added {
        info!(constraint = %name, "Creating new constraint");
        out.push(add_constraint(constraint));
    }
    for change in &diff.constraints.changed {
        info!(constraint = %change.key, "Re-creating changed constraint");
        out.push(add_constraint(change.new));
    }
}

fn add_constraint(constraint: &Constraint) -> String {
    format!(
        "ALTER TABLE {} ADD {}",
        quote_path(&constraint.table),
        constraint.definition
    )
}

fn update_change_streams(diff: &Differences<'_>, out: &mut Vec<String>) {
    for (name, stream) in &diff.change_streams.added {
        info!(change_stream = %name, "Creating new change stream");
        out.push(stream.to_string());
    }

    for change in &diff.change_streams.changed {
        info!(change_stream = %change.key, "Updating change stream");
        let name = quote_path(change.key);
        if change.old.for_clause != change.new.for_clause {
            match &change.new.for_clause {
                Some(for_clause) => {
                    out.push(format!("ALTER CHANGE STREAM {name} SET {for_clause}"));
                }
                None => out.push(format!("ALTER CHANGE STREAM {name} DROP FOR ALL")),
            }
        }
        if let Some(delta) =
            option_list_delta(change.old.options.as_ref(), change.new.options.as_ref())
        {
            out.push(format!("ALTER CHANGE STREAM {name} SET OPTIONS ({delta})"));
        }
    }
}
