//! Abstract Syntax Tree (AST) types for Cloud Spanner DDL statements.

mod clause;
mod statement;
mod types;

pub use clause::{
    is_plain_identifier, quote_identifier, quote_list, quote_path, CheckConstraint, Expr,
    ForeignKey, KeyPart, OnDelete, OptionList, OrderDirection, RowDeletionPolicy,
    TableConstraint, TableInterleave,
};
pub use statement::{
    AlterDatabase, AlterTable, AlterTableAction, ChangeStreamFor, CreateChangeStream, CreateIndex,
    CreateLocalityGroup, CreateSchema, CreateSearchIndex, CreateTable, Statement, TrackedTable,
    UnsupportedStatement,
};
pub use types::{ColumnDef, ColumnType, Generation, TypeLength, BUILTIN_TYPES};
