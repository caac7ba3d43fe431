//! Schema diffing for Cloud Spanner DDL.
//!
//! `spanner-ddl-diff` compares two DDL texts describing a database schema
//! and generates the ordered DDL statements that migrate the first schema
//! into the second, without ever touching a database.
//!
//! # Architecture
//!
//! - **Snapshot** - Normalizes parsed statements into keyed collections
//! - **Difference** - Splits two collections into removed, added and changed entries
//! - **Table** - In-place `ALTER TABLE` rules for changed tables
//! - **Search index** - `ALTER SEARCH INDEX` rules for changed search indexes
//! - **Diff** - Schedules every statement in dependency order
//! - **Validate** - Referential integrity checks on a single schema
//!
//! # Example
//!
//! ```rust
//! use spanner_ddl_diff::prelude::*;
//!
//! let original = "CREATE TABLE t (a INT64, b INT64 NOT NULL) PRIMARY KEY (a)";
//! let new = "CREATE TABLE t (a INT64) PRIMARY KEY (a)";
//!
//! let options = DiffOptions::new().with_drop_statements();
//! let statements = generate_diff(original, new, &options).unwrap();
//! assert_eq!(statements, vec!["ALTER TABLE t DROP COLUMN b"]);
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! spanner-ddl-diff \
//!     --original-ddl-file original.ddl \
//!     --new-ddl-file new.ddl \
//!     --output-ddl-file alter.ddl \
//!     --allow-drop-statements
//! ```

pub mod diff;
pub mod difference;
pub mod error;
pub mod files;
pub mod options;
pub mod search_index;
pub mod snapshot;
pub mod table;
pub mod validate;

use crate::diff::DdlDiff;
use crate::error::Result;
use crate::options::DiffOptions;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::diff::DdlDiff;
    pub use crate::difference::{diff_maps, diff_rendered, options_delta, MapDifference};
    pub use crate::error::{DdlSide, DiffError, Result};
    pub use crate::files::{read_ddl, render_statements, write_output, OutputFormat};
    pub use crate::generate_diff;
    pub use crate::options::DiffOptions;
    pub use crate::search_index::SearchIndexUpdates;
    pub use crate::snapshot::{Constraint, SchemaSnapshot, Table};
    pub use crate::validate::{validate, validate_ddl};
}

/// Generates the statements migrating `original_ddl` to `new_ddl`.
///
/// # Errors
///
/// Returns an error if either text cannot be parsed or diffed, or a change
/// is not permitted by `options`.
pub fn generate_diff(
    original_ddl: &str,
    new_ddl: &str,
    options: &DiffOptions,
) -> Result<Vec<String>> {
    DdlDiff::build(original_ddl, new_ddl, options)?.generate_statements(options)
}
