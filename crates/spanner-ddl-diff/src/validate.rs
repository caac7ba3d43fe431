//! Referential integrity checks on a single schema.

use spanner_ddl_core::ast::TableConstraint;
use tracing::{debug, info};

use crate::error::{DdlSide, DiffError, Result};
use crate::options::DiffOptions;
use crate::snapshot::SchemaSnapshot;

/// Checks that foreign keys and indexes only reference tables and
/// columns that exist.
///
/// # Errors
///
/// Returns every violation found, combined with [`DiffError::from_errors`].
pub fn validate(snapshot: &SchemaSnapshot) -> Result<()> {
    let mut errors = Vec::new();

    for (name, constraint) in &snapshot.constraints {
        let TableConstraint::ForeignKey(fk) = &constraint.definition else {
            continue;
        };
        let Some(referenced) = snapshot.tables.get(&fk.referenced_table) else {
            errors.push(DiffError::ForeignKeyTableMissing {
                table: constraint.table.clone(),
                constraint: name.clone(),
                referenced_table: fk.referenced_table.clone(),
            });
            continue;
        };
        for column in &fk.referenced_columns {
            if !referenced.columns.contains_key(column) {
                errors.push(DiffError::ForeignKeyColumnMissing {
                    table: constraint.table.clone(),
                    constraint: name.clone(),
                    column: column.clone(),
                    referenced_table: fk.referenced_table.clone(),
                });
            }
        }
    }

    for (name, index) in &snapshot.indexes {
        let Some(table) = snapshot.tables.get(&index.table) else {
            errors.push(DiffError::IndexTableMissing {
                index: name.clone(),
                table: index.table.clone(),
            });
            continue;
        };
        let columns = index
            .key_parts
            .iter()
            .map(|part| &part.column)
            .chain(&index.storing);
        for column in columns {
            if !table.columns.contains_key(column) {
                errors.push(DiffError::IndexColumnMissing {
                    index: name.clone(),
                    table: index.table.clone(),
                    column: column.clone(),
                });
            }
        }
    }

    debug!(violations = errors.len(), "Validated schema");
    DiffError::from_errors(errors).map_or(Ok(()), Err)
}

/// Parses `ddl`, builds its snapshot and validates it.
///
/// # Errors
///
/// Returns parse and build errors as well as every integrity violation.
pub fn validate_ddl(ddl: &str, options: &DiffOptions) -> Result<()> {
    let statements = spanner_ddl_core::parse_ddl(ddl)
        .map_err(|err| DiffError::parse(DdlSide::New, ddl, err))?;
    let snapshot = SchemaSnapshot::build(&statements, options)?;
    validate(&snapshot)?;
    info!(tables = snapshot.tables.len(), "Schema is valid");
    Ok(())
}
