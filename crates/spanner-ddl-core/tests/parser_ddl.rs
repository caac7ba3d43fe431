//! Tests for parsing the supported DDL statement shapes.

mod common;
use common::*;

use spanner_ddl_core::ast::{
    AlterTableAction, ChangeStreamFor, ColumnType, OnDelete, OrderDirection, Statement,
    TableConstraint, TypeLength,
};
use spanner_ddl_core::parse_ddl;

// =============================================================================
// CREATE TABLE
// =============================================================================

#[test]
fn create_table_with_all_column_clauses() {
    let table = parse_table(
        "CREATE TABLE IF NOT EXISTS Orders (
            OrderId INT64 NOT NULL,
            Total NUMERIC AS (Price * Quantity) STORED,
            Note STRING(MAX) DEFAULT ('none') HIDDEN,
            Updated TIMESTAMP OPTIONS (allow_commit_timestamp = true),
        ) PRIMARY KEY (OrderId DESC)",
    );
    assert!(table.if_not_exists);
    assert_eq!(table.name, "Orders");
    assert_eq!(table.columns.len(), 4);

    let total = &table.columns[1];
    let generation = total.generation.as_ref().unwrap();
    assert_eq!(generation.expr.as_str(), "Price * Quantity");
    assert!(generation.stored);

    let note = &table.columns[2];
    assert_eq!(note.default.as_ref().unwrap().as_str(), "'none'");
    assert!(note.hidden);

    let updated = &table.columns[3];
    let options = updated.options.as_ref().unwrap();
    assert_eq!(options.get("allow_commit_timestamp").unwrap().as_str(), "TRUE");

    assert_eq!(table.primary_key[0].direction, OrderDirection::Desc);
}

#[test]
fn create_table_column_types() {
    let table = parse_table(
        "CREATE TABLE t (
            a BOOL, b int64, c FLOAT32, d STRING(100), e BYTES(max),
            f ARRAY<STRING(10)>, g ARRAY<FLOAT32>(vector_length=>3),
            h my.package.Message, i JSON
        ) PRIMARY KEY (a)",
    );
    let types: Vec<String> = table
        .columns
        .iter()
        .map(|c| c.column_type.to_string())
        .collect();
    assert_eq!(
        types,
        vec![
            "BOOL",
            "INT64",
            "FLOAT32",
            "STRING(100)",
            "BYTES(MAX)",
            "ARRAY<STRING(10)>",
            "ARRAY<FLOAT32>(vector_length=>3)",
            "my.package.Message",
            "JSON",
        ]
    );
    assert_eq!(
        table.columns[3].column_type,
        ColumnType::Sized {
            name: String::from("STRING"),
            length: TypeLength::Limit(100),
        }
    );
}

#[test]
fn create_table_inline_constraints_and_policy() {
    let table = parse_table(
        "CREATE TABLE Albums (
            SingerId INT64, AlbumId INT64, Created TIMESTAMP,
            CONSTRAINT fk_singer FOREIGN KEY (SingerId) REFERENCES Singers (SingerId) ON DELETE CASCADE,
            CONSTRAINT ck_id CHECK (AlbumId > 0),
        ) PRIMARY KEY (SingerId, AlbumId),
          INTERLEAVE IN PARENT Singers ON DELETE CASCADE,
          ROW DELETION POLICY (OLDER_THAN(Created, INTERVAL 7 DAY))",
    );
    assert_eq!(table.constraints.len(), 2);
    match &table.constraints[0] {
        TableConstraint::ForeignKey(fk) => {
            assert_eq!(fk.referenced_table, "Singers");
            assert_eq!(fk.on_delete, Some(OnDelete::Cascade));
        }
        other => panic!("Expected foreign key, got {other:?}"),
    }
    assert_eq!(
        table.interleave.as_ref().unwrap().on_delete,
        Some(OnDelete::Cascade)
    );
    let policy = table.row_deletion_policy.as_ref().unwrap();
    assert_eq!(policy.function, "OLDER_THAN");
    assert_eq!(policy.column, "Created");
    assert_eq!(policy.days, 7);
}

#[test]
fn create_table_with_plain_interleave() {
    let table = parse_table("CREATE TABLE c (a INT64) PRIMARY KEY (a), INTERLEAVE IN p");
    let interleave = table.interleave.unwrap();
    assert_eq!(interleave.parent, "p");
    assert_eq!(interleave.on_delete, None);
}

#[test]
fn anonymous_constraints_are_parsed() {
    let table = parse_table(
        "CREATE TABLE t (a INT64, FOREIGN KEY (a) REFERENCES u (b), CHECK (a > 1)) PRIMARY KEY (a)",
    );
    assert!(table.constraints.iter().all(|c| c.name().is_none()));
}

#[test]
fn keywords_as_identifiers() {
    let table = parse_table("CREATE TABLE Key (Options INT64, `Order` INT64) PRIMARY KEY (Options)");
    assert_eq!(table.name, "Key");
    assert_eq!(table.columns[0].name, "Options");
    assert_eq!(table.columns[1].name, "Order");
}

// =============================================================================
// Indexes
// =============================================================================

#[test]
fn create_index_flags_and_clauses() {
    let index = parse_index(
        "CREATE UNIQUE NULL_FILTERED INDEX IF NOT EXISTS AlbumsByTitle \
         ON Albums (Title, Year DESC) STORING (Genre), INTERLEAVE IN Singers",
    );
    assert!(index.unique && index.null_filtered && index.if_not_exists);
    assert_eq!(index.table, "Albums");
    assert_eq!(index.key_parts.len(), 2);
    assert_eq!(index.storing, vec!["Genre"]);
    assert_eq!(index.interleave_in.as_deref(), Some("Singers"));
}

#[test]
fn create_search_index_all_clauses() {
    let search = parse_search_index(
        "CREATE SEARCH INDEX AlbumsIndex ON Albums (Title_Tokens, Lyrics_Tokens)
         STORING (Genre) PARTITION BY SingerId ORDER BY ReleaseTimestamp DESC
         WHERE Genre IS NOT NULL AND ReleaseTimestamp IS NOT NULL,
         INTERLEAVE IN Singers OPTIONS (sort_order_sharding = true)",
    );
    assert_eq!(search.token_columns, vec!["Title_Tokens", "Lyrics_Tokens"]);
    assert_eq!(search.partition_by, vec!["SingerId"]);
    assert_eq!(search.order_by[0].column, "ReleaseTimestamp");
    assert_eq!(
        search.filter.as_ref().unwrap().as_str(),
        "Genre IS NOT NULL AND ReleaseTimestamp IS NOT NULL"
    );
    assert_eq!(search.interleave_in.as_deref(), Some("Singers"));
    assert!(search.options.is_some());
}

// =============================================================================
// Change streams, schemas, locality groups, ALTER
// =============================================================================

#[test]
fn create_change_stream_for_clauses() {
    let all = parse_change_stream("CREATE CHANGE STREAM everything FOR ALL");
    assert_eq!(all.for_clause, Some(ChangeStreamFor::All));

    let some = parse_change_stream(
        "CREATE CHANGE STREAM s FOR Singers, Albums(Title, Year), Songs() \
         OPTIONS (retention_period = '36h', value_capture_type = 'NEW_VALUES')",
    );
    match some.for_clause.unwrap() {
        ChangeStreamFor::Tables(tables) => {
            assert_eq!(tables.len(), 3);
            assert_eq!(tables[0].columns, None);
            assert_eq!(tables[1].columns.as_ref().unwrap().len(), 2);
            assert_eq!(tables[2].columns, Some(vec![]));
        }
        ChangeStreamFor::All => panic!("Expected table list"),
    }
    assert_eq!(some.options.unwrap().entries().len(), 2);

    let none = parse_change_stream("CREATE CHANGE STREAM idle");
    assert!(none.for_clause.is_none());
}

#[test]
fn create_schema_and_locality_group() {
    assert!(matches!(
        parse("CREATE SCHEMA IF NOT EXISTS sales"),
        Statement::CreateSchema(s) if s.name == "sales" && s.if_not_exists
    ));
    match parse("CREATE LOCALITY GROUP cold OPTIONS (storage = 'hdd')") {
        Statement::CreateLocalityGroup(group) => {
            assert_eq!(group.name.as_deref(), Some("cold"));
            assert!(group.options.is_some());
        }
        other => panic!("Expected CREATE LOCALITY GROUP, got {other:?}"),
    }
}

#[test]
fn alter_table_add_row_deletion_policy() {
    match parse("ALTER TABLE t ADD ROW DELETION POLICY (OLDER_THAN(ts, INTERVAL 30 DAY))") {
        Statement::AlterTable(alter) => {
            assert_eq!(alter.table, "t");
            assert!(matches!(
                alter.action,
                AlterTableAction::AddRowDeletionPolicy(ref p) if p.days == 30
            ));
        }
        other => panic!("Expected ALTER TABLE, got {other:?}"),
    }
}

#[test]
fn alter_database_options() {
    match parse("ALTER DATABASE `my-db` SET OPTIONS (optimizer_version = 3, version_retention_period = '7d')") {
        Statement::AlterDatabase(alter) => {
            assert_eq!(alter.name, "my-db");
            assert_eq!(alter.options.get("optimizer_version").unwrap().as_str(), "3");
        }
        other => panic!("Expected ALTER DATABASE, got {other:?}"),
    }
}

#[test]
fn unsupported_statement_kinds() {
    let statements = parse_ddl(
        "CREATE OR REPLACE VIEW v SQL SECURITY INVOKER AS SELECT 1;
         CREATE SEQUENCE seq OPTIONS (sequence_kind = 'bit_reversed_positive');
         CREATE PROTO BUNDLE (a.b.C);
         ALTER INDEX i ADD STORED COLUMN c;
         ALTER SEARCH INDEX s ADD COLUMN c;
         GRANT SELECT ON TABLE t TO ROLE r;
         DROP INDEX i",
    )
    .unwrap();
    let kinds: Vec<String> = statements
        .iter()
        .map(|s| match s {
            Statement::Unsupported(u) => u.kind.clone(),
            other => panic!("Expected unsupported statement, got {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "CREATE OR REPLACE",
            "CREATE SEQUENCE",
            "CREATE PROTO BUNDLE",
            "ALTER INDEX",
            "ALTER SEARCH INDEX",
            "GRANT",
            "DROP",
        ]
    );
}

#[test]
fn comments_do_not_split_statements() {
    let statements = parse_ddl(
        "-- header; with a semicolon
         CREATE TABLE a (x INT64) /* ; */ PRIMARY KEY (x);
         # another; comment
         CREATE TABLE b (y INT64) PRIMARY KEY (y);",
    )
    .unwrap();
    assert_eq!(statements.len(), 2);
}
