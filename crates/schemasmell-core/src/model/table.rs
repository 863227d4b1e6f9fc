//! Table entity and facts derived about it

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::index::Index;

/// Projection of `information_schema.TABLES`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableInfo {
    pub table_type: String,
    pub engine: Option<String>,
    pub row_format: Option<String>,
    pub table_rows: u64,
    pub avg_row_length: u64,
    pub data_length: u64,
    pub index_length: u64,
    pub data_free: u64,
    pub auto_increment: Option<u64>,
    pub table_collation: Option<String>,
    pub create_options: String,
    pub table_comment: String,
}

impl Default for TableInfo {
    fn default() -> Self {
        Self {
            table_type: "BASE TABLE".to_string(),
            engine: Some("InnoDB".to_string()),
            row_format: Some("Dynamic".to_string()),
            table_rows: 0,
            avg_row_length: 0,
            data_length: 0,
            index_length: 0,
            data_free: 0,
            auto_increment: None,
            table_collation: None,
            create_options: String::new(),
            table_comment: String::new(),
        }
    }
}

/// How much of an auto-increment column's range is consumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoIncrementUsage {
    pub column_name: String,
    pub data_type: String,
    pub unsigned: bool,

    /// Largest value the column type can hold
    pub max_value: u64,

    /// Next value the counter will hand out
    pub auto_increment: u64,
}

impl AutoIncrementUsage {
    /// Values already handed out
    pub fn used(&self) -> u64 {
        self.auto_increment.saturating_sub(1)
    }

    pub fn usage_percent(&self) -> f64 {
        if self.max_value == 0 {
            return 100.0;
        }
        self.used() as f64 / self.max_value as f64 * 100.0
    }
}

/// An index made unnecessary by another one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedundantIndex {
    pub redundant_index: String,
    pub redundant_columns: Vec<String>,
    pub redundant_is_unique: bool,
    pub dominant_index: String,
    pub dominant_columns: Vec<String>,
}

/// Row access counters (`sys.schema_table_statistics`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessStats {
    pub rows_fetched: u64,
    pub rows_inserted: u64,
    pub rows_updated: u64,
    pub rows_deleted: u64,
    pub full_scans: u64,
}

/// Facts attached after the catalog is built
///
/// `None` means the fact was never gathered, which is not the same as an
/// empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFacts {
    pub auto_increment: Option<AutoIncrementUsage>,
    pub redundant_indexes: Option<Vec<RedundantIndex>>,
    pub unused_indexes: Option<Vec<String>>,
    pub access: Option<AccessStats>,
}

/// A table with its columns and indexes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,

    /// Owning schema (lookup key)
    #[serde(default)]
    pub schema_name: String,

    #[serde(default)]
    pub info: TableInfo,

    #[serde(default)]
    columns: Vec<Column>,

    #[serde(default)]
    indexes: Vec<Index>,

    #[serde(default)]
    pub facts: TableFacts,
}

impl Table {
    pub fn new(schema_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: schema_name.into(),
            info: TableInfo::default(),
            columns: Vec::new(),
            indexes: Vec::new(),
            facts: TableFacts::default(),
        }
    }

    /// `schema.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.name)
    }

    /// Columns in ordinal order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Column names are case-insensitive in MySQL
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Index names are case-insensitive in MySQL
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Ordinal the next appended column receives
    pub fn next_ordinal(&self) -> u32 {
        self.columns.len() as u32 + 1
    }

    /// Append a column; callers check for name collisions first
    pub fn push_column(&mut self, mut column: Column) {
        column.table_name = self.name.clone();
        column.schema_name = self.schema_name.clone();
        self.columns.push(column);
    }

    /// Append an index; callers check for name collisions first
    pub fn push_index(&mut self, mut index: Index) {
        index.table_name = self.name.clone();
        index.schema_name = self.schema_name.clone();
        self.indexes.push(index);
    }

    pub fn primary_key(&self) -> Option<&Index> {
        self.indexes.iter().find(|i| i.is_primary())
    }

    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_primary()).collect()
    }

    pub fn secondary_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter().filter(|i| !i.is_primary())
    }

    pub fn auto_increment_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_auto_increment())
    }

    pub fn is_base_table(&self) -> bool {
        self.info.table_type.eq_ignore_ascii_case("BASE TABLE")
    }

    /// Views have no storage of their own
    pub fn is_virtual(&self) -> bool {
        self.info.table_type.eq_ignore_ascii_case("VIEW")
    }

    pub fn is_innodb(&self) -> bool {
        self.info
            .engine
            .as_deref()
            .is_some_and(|engine| engine.eq_ignore_ascii_case("InnoDB"))
    }

    /// Restore owner names on every column and index
    pub fn relink(&mut self) {
        for column in &mut self.columns {
            column.table_name = self.name.clone();
            column.schema_name = self.schema_name.clone();
        }
        for index in &mut self.indexes {
            index.table_name = self.name.clone();
            index.schema_name = self.schema_name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::column::ColumnKey;

    fn orders() -> Table {
        let mut table = Table::new("shop", "orders");

        let mut id = Column::new("id");
        id.info.data_type = "int".into();
        id.info.column_key = ColumnKey::Primary;
        id.info.extra = "auto_increment".into();
        table.push_column(id);
        table.push_column(Column::new("customer_id"));

        let mut primary = Index::new("PRIMARY", true);
        primary.push_column("id", None);
        table.push_index(primary);

        let mut by_customer = Index::new("idx_customer", false);
        by_customer.push_column("customer_id", None);
        table.push_index(by_customer);

        table
    }

    #[test]
    fn children_receive_back_references() {
        let table = orders();
        assert_eq!(table.columns()[0].qualified_name(), "shop.orders.id");
        assert_eq!(table.indexes()[1].qualified_name(), "shop.orders.idx_customer");
    }

    #[test]
    fn lookups() {
        let table = orders();
        assert!(table.column("ID").is_some());
        assert_eq!(table.next_ordinal(), 3);
        assert_eq!(table.primary_key().unwrap().name, "PRIMARY");
        assert_eq!(table.primary_key_columns().len(), 1);
        assert_eq!(table.secondary_indexes().count(), 1);
        assert_eq!(table.auto_increment_column().unwrap().name, "id");
        assert!(table.is_innodb());
        assert!(table.is_base_table());
    }

    #[test]
    fn relink_after_rename() {
        let mut table = orders();
        table.name = "purchases".into();
        table.relink();
        assert!(table.columns().iter().all(|c| c.table_name == "purchases"));
        assert!(table.indexes().iter().all(|i| i.table_name == "purchases"));
    }

    #[test]
    fn auto_increment_usage_percent() {
        let usage = AutoIncrementUsage {
            column_name: "id".into(),
            data_type: "tinyint".into(),
            unsigned: false,
            max_value: 127,
            auto_increment: 128,
        };
        assert_eq!(usage.used(), 127);
        assert!((usage.usage_percent() - 100.0).abs() < f64::EPSILON);
    }
}
