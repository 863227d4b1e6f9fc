//! Auto-increment counters running out of range

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

const WARNING_PERCENT: f64 = 60.0;
const CRITICAL_PERCENT: f64 = 80.0;

/// Columns this small are expected to fill up; never worse than WARNING
const SMALL_RANGE: u64 = 1024;

/// Share of the auto-increment column's range already handed out
///
/// Only integer counters have a fixed range; FLOAT and DOUBLE counters are
/// not checked.
pub struct AutoIncrementCapacity;

impl Check for AutoIncrementCapacity {
    fn name(&self) -> &'static str {
        "auto_increment_capacity"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity
            .as_table()
            .and_then(|table| table.auto_increment_column())
            .is_some_and(|column| column.is_integer())
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(table) = entity.as_table() else {
            return Ok(None);
        };
        let usage = table
            .facts
            .auto_increment
            .as_ref()
            .ok_or_else(|| self.unavailable(entity, "auto_increment usage"))?;

        let percent = usage.usage_percent();
        let mut status = if percent >= CRITICAL_PERCENT {
            Status::Critical
        } else if percent >= WARNING_PERCENT {
            Status::Warning
        } else {
            Status::Ok
        };
        if usage.max_value <= SMALL_RANGE {
            status = status.min(Status::Warning);
        }

        let messages = if status > Status::Ok {
            vec![format!(
                "{}.{} ({}) has used {:.2}% of its range ({} of {})",
                table.qualified_name(),
                usage.column_name,
                usage.data_type,
                percent,
                usage.used(),
                usage.max_value
            )]
        } else {
            vec![]
        };

        Ok(Some(
            self.report(entity, status, messages)
                .with_data("column", usage.column_name.clone())
                .with_data("used", usage.used())
                .with_data("max_value", usage.max_value)
                .with_data("percent", percent),
        ))
    }
}
