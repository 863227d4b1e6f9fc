//! Catalog construction
//!
//! This crate turns parsed MySQL DDL into a [`Database`](schemasmell_core::Database):
//! - [`CatalogBuilder`] applies statements in order (`USE`, `CREATE TABLE`, `ALTER TABLE`, ...)
//! - [`analysis`] derives the facts a live server would report (auto-increment usage, redundant indexes)
//! - [`Snapshot`] loads a catalog captured from a live server
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemasmell_catalog::build_catalog;
//!
//! let database = build_catalog("schema.sql", "USE shop; CREATE TABLE t (id INT PRIMARY KEY);")?;
//! assert!(database.schema("shop").is_some());
//! ```

pub mod analysis;
pub mod builder;
pub mod snapshot;

pub use analysis::{derive_facts, redundant_indexes};
pub use builder::{build_catalog, BuildError, CatalogBuilder, SENTINEL_SCHEMA, UNNAMED_INDEX};
pub use snapshot::{Snapshot, SnapshotError};
