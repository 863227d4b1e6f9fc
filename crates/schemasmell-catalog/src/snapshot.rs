//! Introspection snapshots
//!
//! A live-introspection tool can dump the catalog it read from a server as
//! JSON. Loading a snapshot restores the owner back-references, parses the
//! query digests and checks the same structural rules the builder enforces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use schemasmell_core::{Database, Table, PRIMARY_INDEX};
use schemasmell_sql::QueryParser;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::analysis::derive_facts;
use crate::builder::BuildError;

/// Snapshot loading errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    Build(#[from] BuildError),
}

/// A catalog captured from a live server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Where the catalog was read from (host:port)
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,

    pub database: Database,
}

impl Snapshot {
    pub fn new(database: Database) -> Self {
        Self {
            source: None,
            captured_at: Some(Utc::now()),
            database,
        }
    }

    /// Load and validate a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.prepare()?;
        Ok(snapshot)
    }

    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_database(self) -> Database {
        self.database
    }

    fn prepare(&mut self) -> Result<(), SnapshotError> {
        let database = &mut self.database;
        database.relink();
        validate_names(database)?;

        for schema in database.schemas() {
            for table in schema.tables() {
                validate_table(table)?;
            }
        }

        let parser = QueryParser::new();
        for query in database.queries_mut() {
            if let Err(err) = parser.resolve(query) {
                debug!(digest = %query.short_text(60), error = %err, "query digest not parsed");
            }
        }

        derive_facts(database);
        Ok(())
    }
}

/// Schema names unique per database, table names unique per schema
fn validate_names(database: &Database) -> Result<(), BuildError> {
    let mut schemas = HashSet::new();
    for schema in database.schemas() {
        if !schemas.insert(schema.name.as_str()) {
            return Err(BuildError::ExistingSchema {
                schema: schema.name.clone(),
            });
        }

        let mut tables = HashSet::new();
        for table in schema.tables() {
            if !tables.insert(table.name.as_str()) {
                return Err(BuildError::ExistingTable {
                    table: table.qualified_name(),
                });
            }
        }
    }
    Ok(())
}

/// Column and index names unique, primary key over existing columns
fn validate_table(table: &Table) -> Result<(), BuildError> {
    let mut columns = HashSet::new();
    for column in table.columns() {
        if !columns.insert(column.name.to_ascii_lowercase()) {
            return Err(BuildError::ExistingColumn {
                table: table.qualified_name(),
                column: column.name.clone(),
            });
        }
    }

    let mut indexes = HashSet::new();
    for index in table.indexes() {
        if !indexes.insert(index.name.to_ascii_lowercase()) {
            return Err(BuildError::ExistingIndex {
                table: table.qualified_name(),
                index: index.name.clone(),
            });
        }
    }

    if let Some(primary) = table.index(PRIMARY_INDEX) {
        for name in primary.column_names() {
            if !columns.contains(&name.to_ascii_lowercase()) {
                return Err(BuildError::InvalidColumn {
                    table: table.qualified_name(),
                    column: name.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_catalog;
    use schemasmell_core::{Query, QuerySummary};

    fn snapshot_json() -> String {
        let mut database =
            build_catalog("db1:3306", "USE shop; CREATE TABLE orders (id INT PRIMARY KEY, a INT, KEY i1 (a), KEY i2 (a));")
                .unwrap();
        database.add_query(Query::new(
            "SELECT * FROM `orders` WHERE `id` = ?",
            QuerySummary::default(),
        ));
        Snapshot::new(database).to_json().unwrap()
    }

    #[test]
    fn load_relinks_and_parses_queries() {
        let snapshot = Snapshot::from_json(&snapshot_json()).unwrap();
        let database = snapshot.into_database();

        let table = &database.schema("shop").unwrap().tables()[0];
        assert_eq!(table.columns()[0].qualified_name(), "shop.orders.id");

        let query = &database.queries()[0];
        assert!(query.is_parsed());
        assert!(query.tables.contains_key("orders"));
    }

    #[test]
    fn load_derives_missing_facts() {
        let database = Snapshot::from_json(&snapshot_json()).unwrap().into_database();
        let table = &database.schema("shop").unwrap().tables()[0];
        let redundant = table.facts.redundant_indexes.as_ref().unwrap();
        assert_eq!(redundant.len(), 1);
        assert_eq!(redundant[0].redundant_index, "i2");
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let json = r#"{
            "database": {
                "name": "db1",
                "schemas": [{
                    "name": "shop",
                    "tables": [{
                        "name": "t",
                        "columns": [{"name": "a"}, {"name": "A"}]
                    }]
                }]
            }
        }"#;

        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Build(BuildError::ExistingColumn { .. })
        ));
    }

    #[test]
    fn duplicate_table_is_rejected() {
        let json = r#"{
            "database": {
                "schemas": [{
                    "name": "s",
                    "tables": [{"name": "t"}, {"name": "t"}]
                }]
            }
        }"#;

        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Build(BuildError::ExistingTable { table }) if table == "s.t"
        ));
    }

    #[test]
    fn duplicate_schema_is_rejected() {
        let json = r#"{
            "database": {
                "schemas": [{"name": "s"}, {"name": "s"}]
            }
        }"#;

        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Build(BuildError::ExistingSchema { schema }) if schema == "s"
        ));
    }

    #[test]
    fn primary_key_over_missing_column_is_rejected() {
        let json = r#"{
            "database": {
                "schemas": [{
                    "name": "shop",
                    "tables": [{
                        "name": "t",
                        "columns": [{"name": "a"}],
                        "indexes": [{
                            "name": "PRIMARY",
                            "unique": true,
                            "statistics": [{"column_name": "b", "seq_in_index": 1}]
                        }]
                    }]
                }]
            }
        }"#;

        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Build(BuildError::InvalidColumn { column, .. }) if column == "b"
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            Snapshot::from_json("{"),
            Err(SnapshotError::Json(_))
        ));
    }
}
