//! Tests for canonical rendering, the equality basis of schema diffs.

mod common;
use common::*;

#[test]
fn table_rendering_is_canonical() {
    assert_eq!(
        canonical(
            "create table if not exists test1 (
                col1 int64,
                col2 string(max) not null options (allow_commit_timestamp=true)
             ) primary key (col1),
             interleave in parent p"
        ),
        "CREATE TABLE test1 (col1 INT64, col2 STRING(MAX) NOT NULL \
         OPTIONS (allow_commit_timestamp=TRUE)) PRIMARY KEY (col1 ASC), \
         INTERLEAVE IN PARENT p ON DELETE NO ACTION"
    );
}

#[test]
fn formatting_differences_render_identically() {
    let a = canonical("CREATE TABLE t (a INT64 DEFAULT (1+2), b INT64 AS (a*2) STORED) PRIMARY KEY (a ASC)");
    let b = canonical(
        "CREATE TABLE t (
            a INT64 DEFAULT ( 1 + 2 ),  -- comment
            b INT64 AS ( a * 2 ) STORED
        ) PRIMARY KEY (a)",
    );
    assert_eq!(a, b);
}

#[test]
fn if_not_exists_is_not_rendered() {
    assert_eq!(
        canonical("CREATE INDEX IF NOT EXISTS i ON t (a)"),
        canonical("CREATE INDEX i ON t (a)")
    );
    assert_eq!(
        canonical("CREATE SCHEMA IF NOT EXISTS s"),
        "CREATE SCHEMA s"
    );
}

#[test]
fn index_rendering_with_and_without_storing() {
    let index = parse_index(
        "CREATE UNIQUE NULL_FILTERED INDEX i ON t (c1, c2 DESC) STORING (c4, c5), INTERLEAVE IN other",
    );
    assert_eq!(
        index.to_string(),
        "CREATE UNIQUE NULL_FILTERED INDEX i ON t (c1 ASC, c2 DESC) STORING (c4, c5), INTERLEAVE IN other"
    );
    assert_eq!(
        index.to_sql_without_storing(),
        "CREATE UNIQUE NULL_FILTERED INDEX i ON t (c1 ASC, c2 DESC), INTERLEAVE IN other"
    );
}

#[test]
fn constraint_rendering() {
    let table = parse_table(
        "CREATE TABLE t (a INT64, b INT64,
            CONSTRAINT n FOREIGN KEY (a, b) REFERENCES u (x, y) ON DELETE CASCADE,
            CONSTRAINT c CHECK (a>b)) PRIMARY KEY (a)",
    );
    assert_eq!(
        table.constraints[0].to_string(),
        "CONSTRAINT n FOREIGN KEY (a, b) REFERENCES u (x, y) ON DELETE CASCADE"
    );
    assert_eq!(table.constraints[1].to_string(), "CONSTRAINT c CHECK (a > b)");
}

#[test]
fn row_deletion_policy_rendering() {
    let table = parse_table(
        "CREATE TABLE t (ts TIMESTAMP) PRIMARY KEY (ts), row deletion policy (older_than(ts, interval 30 day))",
    );
    assert_eq!(
        table.row_deletion_policy.unwrap().to_string(),
        "ROW DELETION POLICY (OLDER_THAN(ts, INTERVAL 30 DAY))"
    );
}

#[test]
fn search_index_rendering() {
    assert_eq!(
        canonical(
            "create search index s on albums(title_tokens) storing(genre) partition by singer_id \
             order by release desc where genre is not null, interleave in singers \
             options(sort_order_sharding=true)"
        ),
        "CREATE SEARCH INDEX s ON albums (title_tokens) STORING (genre) PARTITION BY singer_id \
         ORDER BY release DESC WHERE genre IS NOT NULL, INTERLEAVE IN singers \
         OPTIONS (sort_order_sharding=TRUE)"
    );
}

#[test]
fn change_stream_rendering() {
    assert_eq!(
        canonical("create change stream cs for t1, t2 ( c1 , c2 ) options (retention_period=\"7d\")"),
        "CREATE CHANGE STREAM cs FOR t1, t2(c1, c2) OPTIONS (retention_period='7d')"
    );
}

#[test]
fn reserved_names_are_back_quoted() {
    assert_eq!(
        canonical("CREATE TABLE `Order` (`Key` INT64, `Group` INT64) PRIMARY KEY (`Key`)"),
        "CREATE TABLE `Order` (Key INT64, `Group` INT64) PRIMARY KEY (Key ASC)"
    );
}

#[test]
fn alter_database_rendering() {
    assert_eq!(
        canonical("alter database `my-db` set options (optimizer_version=3)"),
        "ALTER DATABASE `my-db` SET OPTIONS (optimizer_version=3)"
    );
}

#[test]
fn rendering_parses_back_to_itself() {
    let sources = [
        "CREATE TABLE t (a INT64 NOT NULL, b ARRAY<STRING(10)>, c STRING(MAX) DEFAULT ('x')) \
         PRIMARY KEY (a DESC), INTERLEAVE IN PARENT p ON DELETE CASCADE",
        "CREATE NULL_FILTERED INDEX i ON t (a ASC) STORING (b)",
        "CREATE CHANGE STREAM cs FOR ALL OPTIONS (retention_period='1d')",
        "CREATE LOCALITY GROUP hot OPTIONS (storage='ssd')",
    ];
    for source in sources {
        let rendered = canonical(source);
        assert_eq!(canonical(&rendered), rendered);
    }
}
