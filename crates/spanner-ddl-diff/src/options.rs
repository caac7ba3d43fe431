//! Policy flags controlling which statements a diff may emit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options for statement generation.
///
/// Every flag defaults to the conservative choice. A JSON config file
/// may set any subset of the fields:
///
/// ```json
/// { "allow_drop_statements": true, "strict_interleave": true }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Permit `DROP INDEX` + `CREATE INDEX` for changed indexes.
    pub allow_recreate_indexes: bool,
    /// Permit `DROP CONSTRAINT` + `ADD CONSTRAINT` for changed constraints.
    pub allow_recreate_constraints: bool,
    /// Permit statements that drop removed tables, columns and other objects.
    pub allow_drop_statements: bool,
    /// Fail on an interleave parent change instead of emitting `SET INTERLEAVE`.
    pub strict_interleave: bool,
    /// Skip `CREATE/ALTER PROTO BUNDLE` statements instead of rejecting them.
    pub ignore_proto_bundles: bool,
}

impl DiffOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows recreating changed indexes.
    #[must_use]
    pub const fn with_recreate_indexes(mut self) -> Self {
        self.allow_recreate_indexes = true;
        self
    }

    /// Allows recreating changed constraints.
    #[must_use]
    pub const fn with_recreate_constraints(mut self) -> Self {
        self.allow_recreate_constraints = true;
        self
    }

    /// Allows drop statements.
    #[must_use]
    pub const fn with_drop_statements(mut self) -> Self {
        self.allow_drop_statements = true;
        self
    }

    /// Enables strict interleave mode.
    #[must_use]
    pub const fn with_strict_interleave(mut self) -> Self {
        self.strict_interleave = true;
        self
    }

    /// Ignores proto bundle statements.
    #[must_use]
    pub const fn with_ignore_proto_bundles(mut self) -> Self {
        self.ignore_proto_bundles = true;
        self
    }

    /// Loads options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sets every flag that is set in `other`.
    ///
    /// Command-line flags can only turn options on, so later sources are
    /// merged with a logical or.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            allow_recreate_indexes: self.allow_recreate_indexes || other.allow_recreate_indexes,
            allow_recreate_constraints: self.allow_recreate_constraints
                || other.allow_recreate_constraints,
            allow_drop_statements: self.allow_drop_statements || other.allow_drop_statements,
            strict_interleave: self.strict_interleave || other.strict_interleave,
            ignore_proto_bundles: self.ignore_proto_bundles || other.ignore_proto_bundles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_conservative() {
        let options = DiffOptions::new();
        assert!(!options.allow_recreate_indexes);
        assert!(!options.allow_recreate_constraints);
        assert!(!options.allow_drop_statements);
        assert!(!options.strict_interleave);
        assert!(!options.ignore_proto_bundles);
    }

    #[test]
    fn test_builders() {
        let options = DiffOptions::new()
            .with_drop_statements()
            .with_recreate_indexes();
        assert!(options.allow_drop_statements);
        assert!(options.allow_recreate_indexes);
        assert!(!options.allow_recreate_constraints);
    }

    #[test]
    fn test_partial_json() {
        let options: DiffOptions =
            serde_json::from_str(r#"{"allow_recreate_constraints": true}"#).unwrap();
        assert_eq!(options, DiffOptions::new().with_recreate_constraints());
    }

    #[test]
    fn test_merge() {
        let file = DiffOptions::new().with_strict_interleave();
        let flags = DiffOptions::new().with_drop_statements();
        let merged = file.merge(flags);
        assert!(merged.strict_interleave);
        assert!(merged.allow_drop_statements);
        assert!(!merged.ignore_proto_bundles);
    }
}
