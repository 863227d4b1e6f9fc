//! SQL front end
//!
//! This crate handles:
//! - Splitting scripts into statements (quotes, comments, `DELIMITER`)
//! - Tokenizing and parsing the MySQL DDL subset into [`Statement`] records
//! - Parsing query digests with datafusion-sqlparser-rs
//! - Resolving table aliases in parsed queries

pub mod lexer;
pub mod parser;
pub mod query;
pub mod resolver;
pub mod splitter;
pub mod statement;

pub use parser::{parse_script, parse_statement, ParseError};
pub use query::QueryParser;
pub use resolver::TableResolver;
pub use splitter::{split_statements, RawStatement};
pub use statement::{
    AlterAction, ColumnDef, CreateTable, CreateUser, DataTypeDef, DefaultValue, GeneratedDef,
    Grant, IgnoredKind, IndexDef, IndexKind, KeyPart, ObjectName, ParsedStatement, Statement,
    UserSpec,
};
