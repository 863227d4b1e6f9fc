//! schemasmell core
//!
//! Catalog entity model, static MySQL metadata tables and the report model
//! shared by every other crate. Status levels and report fields are part of
//! the JSON output; never renumber or rename them.

pub mod config;
pub mod metadata;
pub mod model;
pub mod report;
pub mod status;

pub use config::{Config, ConfigError, SeverityOverrides};
pub use metadata::{MetadataError, StorageSize, TypeClass};
pub use model::{
    AccessStats, Account, AutoIncrementUsage, Column, ColumnInfo, ColumnKey, Database, Index,
    MysqlVersion, Query, QuerySummary, RedundantIndex, Schema, Statistics, Table, TableFacts,
    TableInfo, TableReference, PRIMARY_INDEX,
};
pub use report::{EntityDescriptor, EntityKind, Report, ReportError, ReportSummary};
pub use status::Status;
