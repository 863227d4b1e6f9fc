//! Integration tests for catalog construction
//!
//! Scripts go through the whole pipeline: split, parse, build, derive facts.

mod fixtures;

use pretty_assertions::assert_eq;
use schemasmell_catalog::{
    build_catalog, derive_facts, BuildError, CatalogBuilder, Snapshot, SENTINEL_SCHEMA,
};
use schemasmell_core::{ColumnKey, Database, PRIMARY_INDEX};

fn shop() -> Database {
    let mut database = build_catalog("shop.sql", fixtures::SHOP).unwrap();
    derive_facts(&mut database);
    database
}

#[test]
fn example_table_without_use() {
    let database = build_catalog("example", fixtures::EXAMPLE_1).unwrap();

    assert_eq!(database.schemas().len(), 1);
    let schema = &database.schemas()[0];
    assert_eq!(schema.name, SENTINEL_SCHEMA);
    assert_eq!(schema.tables().len(), 1);

    let table = &schema.tables()[0];
    assert_eq!(table.name, "example1");
    assert_eq!(table.columns().len(), 1);

    let id = &table.columns()[0];
    assert_eq!(id.name, "id");
    assert!(id.is_integer());
    assert_eq!(id.info.column_key, ColumnKey::Primary);
    assert!(id.is_auto_increment());

    assert_eq!(table.indexes().len(), 1);
    assert_eq!(table.indexes()[0].name, PRIMARY_INDEX);
    assert!(table.indexes()[0].unique);
}

#[test]
fn dropped_database_leaves_no_schemas() {
    let database = build_catalog("example", fixtures::CREATE_USE_DROP).unwrap();
    assert!(database.schemas().is_empty());
}

#[test]
fn sentinel_schema_is_elided_when_unused() {
    let script = format!(
        "CREATE DATABASE {0}; USE {0}; DROP DATABASE {0}; USE real_db; CREATE TABLE t (a INT);",
        SENTINEL_SCHEMA
    );
    let database = build_catalog("noise", &script).unwrap();
    assert!(database.schema(SENTINEL_SCHEMA).is_none());
    assert_eq!(database.schemas().len(), 1);
}

#[test]
fn builds_are_deterministic() {
    assert_eq!(shop(), shop());
}

#[test]
fn ordinals_continue_after_alter() {
    let database = shop();
    let orders = database.schema("shop").unwrap().table("orders").unwrap();

    let ordinals: Vec<u32> = orders
        .columns()
        .iter()
        .map(|c| c.info.ordinal_position)
        .collect();
    assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    assert_eq!(orders.columns()[4].name, "shipped_at");
}

#[test]
fn primary_key_flags_match_primary_index() {
    let database = shop();

    for table in database.schemas().iter().flat_map(|s| s.tables()) {
        let members: Vec<String> = table
            .primary_key()
            .map(|pk| pk.column_names().iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();

        for column in table.columns() {
            assert_eq!(
                column.is_primary(),
                members.contains(&column.name),
                "{}",
                column.qualified_name()
            );
        }
    }
}

#[test]
fn charsets_are_inherited_and_derived() {
    let database = shop();
    let customers = database.schema("shop").unwrap().table("customers").unwrap();

    let email = customers.column("email").unwrap();
    assert_eq!(email.info.character_set_name.as_deref(), Some("utf8mb4"));
    assert_eq!(email.info.collation_name.as_deref(), Some("utf8mb4_unicode_ci"));

    let country = customers.column("country").unwrap();
    assert_eq!(country.info.character_set_name.as_deref(), Some("ascii"));
    assert_eq!(country.info.collation_name.as_deref(), Some("ascii_general_ci"));

    let audit = database.schema("shop").unwrap().table("audit_log").unwrap();
    assert_eq!(audit.info.table_collation.as_deref(), Some("latin1_swedish_ci"));
    assert!(audit.primary_key().is_none());
}

#[test]
fn derived_facts() {
    let database = shop();
    let shop = database.schema("shop").unwrap();

    let customers = shop.table("customers").unwrap();
    let usage = customers.facts.auto_increment.as_ref().unwrap();
    assert_eq!(usage.auto_increment, 5000);
    assert!(usage.unsigned);

    let orders = shop.table("orders").unwrap();
    let redundant = orders.facts.redundant_indexes.as_ref().unwrap();
    assert_eq!(redundant.len(), 1);
    assert_eq!(redundant[0].redundant_index, "idx_customer");
    assert_eq!(redundant[0].dominant_index, "idx_customer_status");

    let audit = shop.table("audit_log").unwrap();
    assert!(audit.facts.auto_increment.is_none());
    assert_eq!(audit.facts.redundant_indexes, Some(Vec::new()));
}

#[test]
fn accounts_from_script() {
    let database = shop();

    let report = database.account("report", "10.0.0.%").unwrap();
    assert!(!report.has_password);
    assert!(report.has_privilege("SELECT"));

    // Schema-level grants carry no global privileges
    let app = database.account("app", "%").unwrap();
    assert!(app.has_password);
    assert!(app.privileges.is_empty());
}

#[test]
fn failed_statement_aborts_the_build() {
    let script = "USE shop;\nCREATE TABLE t (a INT);\nALTER TABLE t ADD INDEX idx (b);\nCREATE TABLE later (a INT);";
    let err = build_catalog("bad", script).unwrap_err();
    assert_eq!(
        err,
        BuildError::InvalidColumn {
            table: "shop.t".into(),
            column: "b".into()
        }
    );
}

#[test]
fn builder_seeded_with_variables() {
    let mut seed = Database::new("seeded");
    seed.set_variable("version", "8.0.36");

    let mut builder = CatalogBuilder::with_database(seed);
    builder.apply_script("USE shop; CREATE TABLE t (a INT);").unwrap();
    let database = builder.finish();

    assert_eq!(database.variable("version"), Some("8.0.36"));
    assert_eq!(database.schemas().len(), 1);
}

#[test]
fn snapshot_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let snapshot = Snapshot::new(shop());
    std::fs::write(&path, snapshot.to_json().unwrap()).unwrap();

    let loaded = Snapshot::from_file(&path).unwrap();
    assert_eq!(loaded.database, snapshot.database);
}
