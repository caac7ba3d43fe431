//! Error types for schema diffing.

use std::fmt;

/// Which of the two DDL inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdlSide {
    /// The schema being migrated from.
    Original,
    /// The schema being migrated to.
    New,
}

impl fmt::Display for DdlSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("ORIGINAL"),
            Self::New => f.write_str("NEW"),
        }
    }
}

/// Errors that can occur while building or diffing schemas.
///
/// Every error is fatal: no partial statement list is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The DDL text could not be parsed.
    #[error("Failed parsing {side} DDL at line {line}, column {column}: {source}")]
    Parse {
        /// Which input failed.
        side: DdlSide,
        /// 1-based line of the failure.
        line: usize,
        /// 1-based column of the failure.
        column: usize,
        /// The underlying parser error.
        source: spanner_ddl_core::ParseError,
    },

    /// A statement outside the diffable subset.
    #[error("Unsupported statement for creating diffs:\n{statement}")]
    Unsupported {
        /// Statement text.
        statement: String,
    },

    /// An `ALTER TABLE` action other than adding a constraint or policy.
    #[error(
        "Unsupported statement:\n{statement}\nALTER TABLE statements only support \
         'ADD [constraint|row deletion policy]'"
    )]
    UnsupportedAlterTable {
        /// Statement text.
        statement: String,
    },

    /// A constraint without a name cannot be keyed.
    #[error(
        "Unsupported statement:\n{statement}\nCan not create diffs when anonymous {kind} \
         constraints are used."
    )]
    AnonymousConstraint {
        /// Statement text.
        statement: String,
        /// Constraint kind, `FOREIGN KEY` or `CHECK`.
        kind: &'static str,
    },

    /// Two objects of the same kind share a name.
    #[error("Duplicate {kind} '{name}' in DDL")]
    Duplicate {
        /// Object kind.
        kind: &'static str,
        /// Object name.
        name: String,
    },

    /// Indexes changed beyond STORING without permission to recreate them.
    #[error(
        "At least one index differs, and allow-recreate-indexes is not set.\nIndexes: {}",
        .0.join(", ")
    )]
    IndexRecreateNotAllowed(Vec<String>),

    /// Constraints changed without permission to recreate them.
    #[error(
        "At least one constraint differs, and allow-recreate-constraints is not set.\n{}",
        .0.join(", ")
    )]
    ConstraintRecreateNotAllowed(Vec<String>),

    /// Schemas cannot be altered.
    #[error("At least one schema differs but ALTER SCHEMA is not supported: {}", .0.join(", "))]
    SchemaChanged(Vec<String>),

    /// Database options changed but no database id is known.
    #[error("No database ID defined - required for Alter Database statements")]
    MissingDatabaseId,

    /// One DDL text names more than one database.
    #[error("Multiple database IDs defined in ALTER DATABASE statements in DDL")]
    MultipleDatabaseIds,

    /// The two DDL texts name different databases.
    #[error("Database IDs differ in old and new DDL ALTER DATABASE statements")]
    DatabaseIdMismatch,

    /// An interleave clause was added or removed.
    #[error("Cannot change interleaving on table {0}")]
    InterleaveChanged(String),

    /// The interleave parent changed while strict interleave mode is on.
    #[error("Cannot change interleaved parent of table {0}")]
    InterleaveParentChanged(String),

    /// The primary key changed.
    #[error("Cannot change primary key of table {0}")]
    PrimaryKeyChanged(String),

    /// A generated column's expression changed.
    #[error("Cannot change generation clause of table {table} column {column} from {from} to {to}")]
    GenerationClauseChanged {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Old clause, or `null`.
        from: String,
        /// New clause, or `null`.
        to: String,
    },

    /// A column type changed in a way Spanner cannot apply in place.
    #[error("Cannot change type of table {table} column {column} from {from} to {to}")]
    TypeChanged {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Old type.
        from: String,
        /// New type.
        to: String,
    },

    /// A search index clause without an ALTER form changed.
    #[error("Cannot generate diff for CREATE SEARCH INDEX: {index} {clause} clause changed")]
    SearchIndexClauseChanged {
        /// Search index name.
        index: String,
        /// Clause name, e.g. `PARTITION BY`.
        clause: &'static str,
    },

    /// A foreign key references a table that does not exist.
    #[error(
        "Table '{table}' contains foreign key '{constraint}' which references table \
         '{referenced_table}' which does not exist."
    )]
    ForeignKeyTableMissing {
        /// Owning table.
        table: String,
        /// Constraint name.
        constraint: String,
        /// Missing table.
        referenced_table: String,
    },

    /// A foreign key references a column that does not exist.
    #[error(
        "Table '{table}' contains foreign key '{constraint}' which references column \
         '{column}' which does not exist in table '{referenced_table}'."
    )]
    ForeignKeyColumnMissing {
        /// Owning table.
        table: String,
        /// Constraint name.
        constraint: String,
        /// Missing column.
        column: String,
        /// Referenced table.
        referenced_table: String,
    },

    /// An index is on a table that does not exist.
    #[error("Index '{index}' is on table '{table}' which does not exist.")]
    IndexTableMissing {
        /// Index name.
        index: String,
        /// Missing table.
        table: String,
    },

    /// An index includes a column that does not exist.
    #[error(
        "Index '{index}' on table '{table}' includes column '{column}' which does not exist \
         in the table."
    )]
    IndexColumnMissing {
        /// Index name.
        index: String,
        /// Indexed table.
        table: String,
        /// Missing column.
        column: String,
    },

    /// Multiple errors occurred.
    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<DiffError>),

    /// IO error reading DDL or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiffError {
    /// Wraps a parser error with its position in `source`.
    #[must_use]
    pub fn parse(side: DdlSide, source: &str, error: spanner_ddl_core::ParseError) -> Self {
        let (line, column) = error.location(source);
        Self::Parse {
            side,
            line,
            column,
            source: error,
        }
    }

    /// Collapses a list of errors: one error is returned as is.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn from_errors(mut errors: Vec<DiffError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }
}

/// Result type for diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;
