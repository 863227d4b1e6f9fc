//! Tables without a primary key

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// CRITICAL when a base table has no primary key columns
pub struct PrimaryKey;

impl Check for PrimaryKey {
    fn name(&self) -> &'static str {
        "primary_key"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity.as_table().is_some_and(|table| table.is_base_table())
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(table) = entity.as_table() else {
            return Ok(None);
        };

        let columns: Vec<&str> = table
            .primary_key_columns()
            .iter()
            .map(|column| column.name.as_str())
            .collect();

        let report = if columns.is_empty() {
            self.report(
                entity,
                Status::Critical,
                vec![format!("Table {} has no primary key", table.qualified_name())],
            )
        } else {
            self.report(entity, Status::Ok, vec![])
                .with_data("columns", columns)
        };

        Ok(Some(report))
    }
}
