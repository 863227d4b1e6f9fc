//! Entities checks run against
//!
//! An [`Entity`] borrows one node of the catalog. Columns and indexes carry
//! their owning table so checks can read row counts and sibling indexes.

use schemasmell_core::{
    Account, Column, Database, EntityDescriptor, EntityKind, Index, Query, Schema, Table,
};

/// A borrowed catalog node
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Database(&'a Database),
    Schema(&'a Schema),
    Table(&'a Table),
    Column { table: &'a Table, column: &'a Column },
    Index { table: &'a Table, index: &'a Index },
    Account(&'a Account),
    Query(&'a Query),
}

impl<'a> Entity<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Database(_) => EntityKind::Database,
            Entity::Schema(_) => EntityKind::Schema,
            Entity::Table(_) => EntityKind::Table,
            Entity::Column { .. } => EntityKind::Column,
            Entity::Index { .. } => EntityKind::Index,
            Entity::Account(_) => EntityKind::Account,
            Entity::Query(_) => EntityKind::Query,
        }
    }

    /// Qualified name used in reports
    pub fn name(&self) -> String {
        match self {
            Entity::Database(database) => database.name.clone(),
            Entity::Schema(schema) => schema.name.clone(),
            Entity::Table(table) => table.qualified_name(),
            Entity::Column { column, .. } => column.qualified_name(),
            Entity::Index { index, .. } => index.qualified_name(),
            Entity::Account(account) => account.key(),
            Entity::Query(query) => query
                .digest
                .clone()
                .unwrap_or_else(|| query.short_text(60)),
        }
    }

    pub fn descriptor(&self) -> EntityDescriptor {
        EntityDescriptor::new(self.kind(), self.name())
    }

    /// Views and virtual generated columns have no storage
    pub fn is_virtual(&self) -> bool {
        match self {
            Entity::Table(table) => table.is_virtual(),
            Entity::Column { table, column } => table.is_virtual() || column.is_virtual(),
            Entity::Index { table, .. } => table.is_virtual(),
            _ => false,
        }
    }

    pub fn as_table(&self) -> Option<&'a Table> {
        match self {
            Entity::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<(&'a Table, &'a Column)> {
        match self {
            Entity::Column { table, column } => Some((table, column)),
            _ => None,
        }
    }

    pub fn as_account(&self) -> Option<&'a Account> {
        match self {
            Entity::Account(account) => Some(account),
            _ => None,
        }
    }

    pub fn as_database(&self) -> Option<&'a Database> {
        match self {
            Entity::Database(database) => Some(database),
            _ => None,
        }
    }

    pub fn as_query(&self) -> Option<&'a Query> {
        match self {
            Entity::Query(query) => Some(query),
            _ => None,
        }
    }
}

/// Every entity of the catalog in a fixed order
///
/// The database first, then accounts, schemas, tables, columns, indexes and
/// finally queries. Within each kind the catalog order is kept.
pub fn entities(database: &Database) -> Vec<Entity<'_>> {
    let tables: Vec<&Table> = database
        .schemas()
        .iter()
        .flat_map(|schema| schema.tables())
        .collect();

    let mut entities = vec![Entity::Database(database)];
    entities.extend(database.accounts().map(Entity::Account));
    entities.extend(database.schemas().iter().map(Entity::Schema));
    entities.extend(tables.iter().copied().map(Entity::Table));
    entities.extend(tables.iter().copied().flat_map(|table| {
        table
            .columns()
            .iter()
            .map(move |column| Entity::Column { table, column })
    }));
    entities.extend(tables.iter().copied().flat_map(|table| {
        table
            .indexes()
            .iter()
            .map(move |index| Entity::Index { table, index })
    }));
    entities.extend(database.queries().iter().map(Entity::Query));
    entities
}
