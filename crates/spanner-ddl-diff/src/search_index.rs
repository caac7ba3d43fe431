//! Incremental changes to an existing search index.

use indexmap::IndexMap;
use spanner_ddl_core::ast::{quote_path, CreateSearchIndex};

use crate::difference::diff_maps;
use crate::error::{DiffError, Result};
use crate::options::DiffOptions;

/// `ALTER SEARCH INDEX` statements for one changed search index.
///
/// Drops run with the other drop statements, creates after the new
/// tables and indexes exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndexUpdates {
    /// `DROP COLUMN` and `DROP STORED COLUMN` statements.
    pub drops: Vec<String>,
    /// `ADD COLUMN` and `ADD STORED COLUMN` statements.
    pub creates: Vec<String>,
}

impl SearchIndexUpdates {
    /// Appends the statements of `other`.
    pub fn extend(&mut self, other: Self) {
        self.drops.extend(other.drops);
        self.creates.extend(other.creates);
    }
}

/// Diffs the token and stored columns of a search index.
///
/// # Errors
///
/// Fails when any clause without an `ALTER` form changed.
pub fn search_index_updates(
    original: &CreateSearchIndex,
    new: &CreateSearchIndex,
    options: &DiffOptions,
) -> Result<SearchIndexUpdates> {
    let clauses: [(&'static str, fn(&CreateSearchIndex) -> Option<String>); 5] = [
        ("PARTITION BY", CreateSearchIndex::partition_by_clause),
        ("ORDER BY", CreateSearchIndex::order_by_clause),
        ("WHERE", CreateSearchIndex::where_clause),
        ("INTERLEAVE IN", CreateSearchIndex::interleave_clause),
        ("OPTIONS", CreateSearchIndex::options_clause),
    ];
    for (clause, render) in clauses {
        if render(original) != render(new) {
            return Err(DiffError::SearchIndexClauseChanged {
                index: new.name.clone(),
                clause,
            });
        }
    }

    let name = quote_path(&new.name);
    let old_tokens = keyed(&original.token_columns);
    let new_tokens = keyed(&new.token_columns);
    let old_stored = keyed(&original.storing);
    let new_stored = keyed(&new.storing);
    let tokens = diff_maps(&old_tokens, &new_tokens, |_, _| true);
    let stored = diff_maps(&old_stored, &new_stored, |_, _| true);

    let mut updates = SearchIndexUpdates::default();
    if options.allow_drop_statements {
        for (column, _) in &tokens.removed {
            updates
                .drops
                .push(format!("ALTER SEARCH INDEX {name} DROP COLUMN {column}"));
        }
    }
    for (column, _) in &stored.removed {
        updates
            .drops
            .push(format!("ALTER SEARCH INDEX {name} DROP STORED COLUMN {column}"));
    }
    for (column, _) in &tokens.added {
        updates
            .creates
            .push(format!("ALTER SEARCH INDEX {name} ADD COLUMN {column}"));
    }
    for (column, _) in &stored.added {
        updates
            .creates
            .push(format!("ALTER SEARCH INDEX {name} ADD STORED COLUMN {column}"));
    }
    Ok(updates)
}

fn keyed(columns: &[String]) -> IndexMap<String, ()> {
    columns.iter().map(|column| (quote_path(column), ())).collect()
}
