#![allow(dead_code)]

use spanner_ddl_core::ast::{
    CreateChangeStream, CreateIndex, CreateSearchIndex, CreateTable, Statement,
};
use spanner_ddl_core::{ParseError, Parser};

pub fn parse(sql: &str) -> Statement {
    Parser::new(sql)
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse_ddl()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

/// Parses `sql` and returns its canonical rendering.
pub fn canonical(sql: &str) -> String {
    parse(sql).to_string()
}

pub fn parse_table(sql: &str) -> CreateTable {
    match parse(sql) {
        Statement::CreateTable(t) => t,
        other => panic!("Expected CREATE TABLE, got {other:?}"),
    }
}

pub fn parse_index(sql: &str) -> CreateIndex {
    match parse(sql) {
        Statement::CreateIndex(i) => i,
        other => panic!("Expected CREATE INDEX, got {other:?}"),
    }
}

pub fn parse_search_index(sql: &str) -> CreateSearchIndex {
    match parse(sql) {
        Statement::CreateSearchIndex(s) => s,
        other => panic!("Expected CREATE SEARCH INDEX, got {other:?}"),
    }
}

pub fn parse_change_stream(sql: &str) -> CreateChangeStream {
    match parse(sql) {
        Statement::CreateChangeStream(c) => c,
        other => panic!("Expected CREATE CHANGE STREAM, got {other:?}"),
    }
}
