//! In-place alterations of an existing table.

use spanner_ddl_core::ast::{quote_path, ColumnDef, ColumnType, TableInterleave};
use tracing::{debug, warn};

use crate::difference::{diff_rendered, option_list_delta};
use crate::error::{DiffError, Result};
use crate::options::DiffOptions;
use crate::snapshot::Table;

/// Root types whose length bound may change in place.
const RESIZABLE_TYPES: [&str; 2] = ["STRING", "BYTES"];

/// Generates the `ALTER TABLE` statements turning `original` into `new`.
///
/// Interleave presence and the primary key must be unchanged. Columns are
/// dropped first, then added, then altered.
///
/// # Errors
///
/// Returns an error for any change with no in-place form.
pub fn alter_table_statements(
    original: &Table,
    new: &Table,
    options: &DiffOptions,
) -> Result<Vec<String>> {
    let table = quote_path(&new.name);
    let mut statements = Vec::new();

    match (&original.interleave, &new.interleave) {
        (None, None) => {}
        (Some(old), Some(new_interleave)) => {
            if let Some(statement) =
                interleave_statement(&new.name, old, new_interleave, options)?
            {
                statements.push(statement);
            }
        }
        _ => return Err(DiffError::InterleaveChanged(new.name.clone())),
    }

    if original.primary_key_clause() != new.primary_key_clause() {
        return Err(DiffError::PrimaryKeyChanged(new.name.clone()));
    }

    let columns = diff_rendered(&original.columns, &new.columns);
    for (name, _) in &columns.removed {
        if options.allow_drop_statements {
            statements.push(format!("ALTER TABLE {table} DROP COLUMN {}", quote_path(name)));
        } else {
            warn!(table = %new.name, column = %name, "Skipping column drop");
        }
    }
    for (_, column) in &columns.added {
        statements.push(format!("ALTER TABLE {table} ADD COLUMN {column}"));
    }
    for change in &columns.changed {
        alter_column_statements(&new.name, change.old, change.new, &mut statements)?;
    }

    debug!(table = %new.name, count = statements.len(), "Generated ALTER TABLE statements");
    Ok(statements)
}

fn interleave_statement(
    table_name: &str,
    old: &TableInterleave,
    new: &TableInterleave,
    options: &DiffOptions,
) -> Result<Option<String>> {
    if old.parent != new.parent {
        if options.strict_interleave {
            return Err(DiffError::InterleaveParentChanged(table_name.to_string()));
        }
    } else if old.on_delete == new.on_delete {
        return Ok(None);
    }

    let table = quote_path(table_name);
    let statement = match new.on_delete {
        Some(on_delete) => format!(
            "ALTER TABLE {table} SET INTERLEAVE IN PARENT {} {on_delete}",
            quote_path(&new.parent)
        ),
        None => format!(
            "ALTER TABLE {table} SET INTERLEAVE IN {}",
            quote_path(&new.parent)
        ),
    };
    Ok(Some(statement))
}

fn alter_column_statements(
    table_name: &str,
    old: &ColumnDef,
    new: &ColumnDef,
    statements: &mut Vec<String>,
) -> Result<()> {
    let table = quote_path(table_name);
    let column = quote_path(&new.name);

    let old_generation = old.generation.as_ref().map(ToString::to_string);
    let new_generation = new.generation.as_ref().map(ToString::to_string);
    if old_generation != new_generation {
        return Err(DiffError::GenerationClauseChanged {
            table: table_name.to_string(),
            column: new.name.clone(),
            from: old_generation.unwrap_or_else(|| String::from("null")),
            to: new_generation.unwrap_or_else(|| String::from("null")),
        });
    }

    let type_changed = old.column_type != new.column_type;
    if type_changed && !is_resizable(&old.column_type, &new.column_type) {
        return Err(DiffError::TypeChanged {
            table: table_name.to_string(),
            column: new.name.clone(),
            from: old.column_type.to_string(),
            to: new.column_type.to_string(),
        });
    }

    if type_changed || old.not_null != new.not_null {
        let not_null = if new.not_null { " NOT NULL" } else { "" };
        statements.push(format!(
            "ALTER TABLE {table} ALTER COLUMN {column} {}{not_null}",
            new.column_type
        ));
    }

    if let Some(delta) = option_list_delta(old.options.as_ref(), new.options.as_ref()) {
        statements.push(format!(
            "ALTER TABLE {table} ALTER COLUMN {column} SET OPTIONS ({delta})"
        ));
    }

    if old.default != new.default {
        match &new.default {
            None => {
                statements.push(format!("ALTER TABLE {table} ALTER COLUMN {column} DROP DEFAULT"));
            }
            Some(default) => statements.push(format!(
                "ALTER TABLE {table} ALTER COLUMN {column} SET DEFAULT ({default})"
            )),
        }
    }
    Ok(())
}

/// A type may change only in the length bound of a STRING or BYTES root.
fn is_resizable(old: &ColumnType, new: &ColumnType) -> bool {
    old.array_depth() == new.array_depth()
        && old.root().type_name() == new.root().type_name()
        && RESIZABLE_TYPES.contains(&new.root().type_name())
}
