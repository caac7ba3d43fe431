//! Tests for referential integrity validation.

use spanner_ddl_core::parse_ddl;
use spanner_ddl_diff::prelude::*;

fn snapshot(ddl: &str) -> SchemaSnapshot {
    SchemaSnapshot::build(&parse_ddl(ddl).unwrap(), &DiffOptions::new()).unwrap()
}

#[test]
fn test_foreign_key_to_missing_column() {
    let err = validate(&snapshot(
        "CREATE TABLE p (id INT64) PRIMARY KEY (id);
         CREATE TABLE c (id INT64, pid INT64) PRIMARY KEY (id);
         ALTER TABLE c ADD CONSTRAINT fk_parent FOREIGN KEY (pid) REFERENCES p (key)",
    ))
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Table 'c' contains foreign key 'fk_parent' which references column 'key' which does \
         not exist in table 'p'."
    );
}

#[test]
fn test_index_on_missing_table() {
    let err = validate(&snapshot("CREATE INDEX idx ON nowhere (a)")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Index 'idx' is on table 'nowhere' which does not exist."
    );
}

#[test]
fn test_index_storing_missing_column() {
    let err = validate(&snapshot(
        "CREATE TABLE t (a INT64, b INT64) PRIMARY KEY (a);
         CREATE INDEX idx ON t (b) STORING (c)",
    ))
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Index 'idx' on table 't' includes column 'c' which does not exist in the table."
    );
}

#[test]
fn test_check_constraints_are_not_validated() {
    validate(&snapshot(
        "CREATE TABLE t (a INT64, CONSTRAINT ck CHECK (whatever > 0)) PRIMARY KEY (a)",
    ))
    .unwrap();
}

#[test]
fn test_validate_ddl_reports_parse_errors() {
    let err = validate_ddl("CREATE TABLE t (a INT64", &DiffOptions::new()).unwrap_err();
    assert!(matches!(
        err,
        DiffError::Parse {
            side: DdlSide::New,
            line: 1,
            ..
        }
    ));
}

#[test]
fn test_multiple_violations() {
    let err = validate(&snapshot(
        "CREATE TABLE t (a INT64) PRIMARY KEY (a);
         CREATE TABLE u (a INT64, CONSTRAINT fk1 FOREIGN KEY (a) REFERENCES gone (a)) PRIMARY KEY (a);
         CREATE INDEX idx ON t (missing)",
    ))
    .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Multiple errors occurred:\n"));
    assert!(message.contains("references table 'gone'"));
    assert!(message.contains("includes column 'missing'"));
}
