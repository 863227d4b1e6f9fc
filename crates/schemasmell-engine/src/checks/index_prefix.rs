//! Long string columns indexed in full

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// Longest string worth indexing in full
const MAX_FULL_LENGTH: u64 = 12;

/// Below this many rows per distinct value a prefix is selective enough
const ROWS_PER_VALUE: f64 = 1000.0;

/// CONCERN when a prefix index would serve a fully indexed string column
pub struct IndexPrefix;

impl Check for IndexPrefix {
    fn name(&self) -> &'static str {
        "index_prefix"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        let Some((table, column)) = entity.as_column() else {
            return false;
        };
        column.is_string()
            && table.indexes().iter().any(|index| {
                index.statistics.iter().any(|part| {
                    part.sub_part.is_none() && part.column_name.eq_ignore_ascii_case(&column.name)
                })
            })
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some((table, column)) = entity.as_column() else {
            return Ok(None);
        };

        let length = column.declared_length().unwrap_or(0);
        let rows = table.info.table_rows;
        let rows_per_value = (column.cardinality > 0).then(|| rows as f64 / column.cardinality as f64);

        let concern = length > MAX_FULL_LENGTH
            && rows_per_value.is_some_and(|ratio| ratio < ROWS_PER_VALUE);

        let report = if concern {
            self.report(
                entity,
                Status::Concern,
                vec![format!(
                    "{} ({} characters) is indexed in full; a prefix index would be smaller",
                    column.qualified_name(),
                    length
                )],
            )
        } else {
            self.report(entity, Status::Ok, vec![])
        };

        Ok(Some(report.with_data("length", length)))
    }
}
