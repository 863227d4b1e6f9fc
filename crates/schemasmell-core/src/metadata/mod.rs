//! Static MySQL metadata tables
//!
//! Immutable lookup tables: character sets, type classification,
//! storage sizes and integer capacities. All lookups are case-insensitive.

pub mod charset;
pub mod storage;
pub mod types;

pub use charset::{charset_for_collation, default_collation};
pub use storage::{max_value, storage_size, StorageSize};
pub use types::{canonical_type_name, classify, TypeClass};

/// Metadata lookup failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("Unknown character set: {0}")]
    UnknownCharacterSet(String),

    #[error("Unknown collation: {0}")]
    UnknownCollation(String),

    #[error("Unknown column type: {0}")]
    UnknownColumnType(String),

    #[error("Invalid column type for this operation: {0}")]
    InvalidColumnType(String),
}
