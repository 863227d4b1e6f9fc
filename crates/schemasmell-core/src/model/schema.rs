//! Schema entity

use serde::{Deserialize, Serialize};

use super::table::Table;

/// A schema (MySQL database) holding tables in creation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,

    #[serde(default)]
    tables: Vec<Table>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.tables.iter_mut()
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Add a table unless one with the same name exists
    ///
    /// Returns `false` and leaves the schema untouched on a name clash.
    pub fn add_table(&mut self, mut table: Table) -> bool {
        if self.contains_table(&table.name) {
            return false;
        }
        table.schema_name = self.name.clone();
        table.relink();
        self.tables.push(table);
        true
    }

    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        let position = self.tables.iter().position(|t| t.name == name)?;
        Some(self.tables.remove(position))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Restore owner names on every table
    pub fn relink(&mut self) {
        for table in &mut self.tables {
            table.schema_name = self.name.clone();
            table.relink();
        }
    }
}
