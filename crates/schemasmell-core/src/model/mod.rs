//! Catalog entity model
//!
//! Owners hold their children by value in ordered containers. Children keep
//! the names of their owners (`schema_name`, `table_name`, `database_name`)
//! as lookup keys only; call `relink` after editing names or deserializing.

pub mod account;
pub mod column;
pub mod database;
pub mod index;
pub mod query;
pub mod schema;
pub mod table;

pub use account::Account;
pub use column::{Column, ColumnInfo, ColumnKey};
pub use database::{Database, MysqlVersion};
pub use index::{Index, Statistics, PRIMARY_INDEX};
pub use query::{Query, QuerySummary, TableReference};
pub use schema::Schema;
pub use table::{AccessStats, AutoIncrementUsage, RedundantIndex, Table, TableFacts, TableInfo};
