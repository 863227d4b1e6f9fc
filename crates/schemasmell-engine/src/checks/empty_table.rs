//! Tables holding no rows

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// WARNING for tables that never held data, INFO for emptied ones
pub struct EmptyTable;

impl Check for EmptyTable {
    fn name(&self) -> &'static str {
        "empty_table"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity.as_table().is_some_and(|table| table.is_base_table())
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(table) = entity.as_table() else {
            return Ok(None);
        };
        let info = &table.info;

        if info.table_rows > 0 {
            return Ok(Some(
                self.report(entity, Status::Ok, vec![])
                    .with_data("table_rows", info.table_rows),
            ));
        }

        // Free space or a moved counter means rows existed once
        let used_before = info.data_free > 0 || info.auto_increment.is_some_and(|next| next > 1);

        let report = if used_before {
            self.report(
                entity,
                Status::Info,
                vec![format!("Table {} has been emptied", table.qualified_name())],
            )
        } else {
            self.report(
                entity,
                Status::Warning,
                vec![format!("Table {} is empty", table.qualified_name())],
            )
        };

        Ok(Some(report.with_data("table_rows", 0)))
    }
}
