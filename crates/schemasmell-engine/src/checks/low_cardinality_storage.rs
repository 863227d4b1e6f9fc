//! Wide string columns holding few distinct values

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

const MIN_STORAGE_BYTES: u64 = 12;
const MIN_ROWS: u64 = 1000;
const MAX_SELECTIVITY: f64 = 0.01;

/// CONCERN when a wide string column repeats a handful of values
///
/// Such columns are better stored as ENUM or moved to a lookup table.
pub struct LowCardinalityStorage;

impl Check for LowCardinalityStorage {
    fn name(&self) -> &'static str {
        "low_cardinality_storage"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        !entity.is_virtual()
            && entity
                .as_column()
                .is_some_and(|(_, column)| column.is_string())
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some((table, column)) = entity.as_column() else {
            return Ok(None);
        };

        let storage = column.storage_size()?.total();
        let rows = table.info.table_rows;
        let selectivity = if rows == 0 {
            1.0
        } else {
            column.cardinality as f64 / rows as f64
        };

        let concern = storage >= MIN_STORAGE_BYTES && rows >= MIN_ROWS && selectivity <= MAX_SELECTIVITY;
        let report = if concern {
            self.report(
                entity,
                Status::Concern,
                vec![format!(
                    "{} takes up to {} bytes but holds only {} distinct values in {} rows",
                    column.qualified_name(),
                    storage,
                    column.cardinality,
                    rows
                )],
            )
        } else {
            self.report(entity, Status::Ok, vec![])
        };

        Ok(Some(
            report
                .with_data("storage", storage)
                .with_data("cardinality", column.cardinality)
                .with_data("table_rows", rows),
        ))
    }
}
