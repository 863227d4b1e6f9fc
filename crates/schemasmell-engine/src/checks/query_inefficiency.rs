//! Statement digests doing much more work than they return

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// Rows examined per row sent considered wasteful
const EXAMINED_PER_SENT: f64 = 100.0;

/// Share of executions using a bad plan before it matters
const BAD_PLAN_RATIO: f64 = 0.2;

pub struct QueryInefficiency;

impl Check for QueryInefficiency {
    fn name(&self) -> &'static str {
        "query_inefficiency"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity
            .as_query()
            .is_some_and(|query| query.summary.exec_count > 0)
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(query) = entity.as_query() else {
            return Ok(None);
        };
        let summary = &query.summary;

        let mut status = Status::Ok;
        let mut messages = Vec::new();

        if let Some(ratio) = summary.examined_per_sent() {
            if ratio >= EXAMINED_PER_SENT {
                status = status.max(Status::Concern);
                messages.push(format!("Examines {:.0} rows for every row sent", ratio));
            }
        }

        let plans = [
            ("full table scans", summary.select_scan),
            ("no index used", summary.no_index_used),
            ("no good index used", summary.no_good_index_used),
            ("full sorts", summary.sort_scan),
        ];
        for (label, count) in plans {
            let ratio = summary.per_execution(count);
            if ratio >= BAD_PLAN_RATIO {
                status = status.max(Status::Warning);
                messages.push(format!("{:.0}% of executions: {}", ratio * 100.0, label));
            }
        }

        if summary.created_tmp_disk_tables > 0 {
            status = status.max(Status::Warning);
            messages.push(format!(
                "Created {} temporary tables on disk",
                summary.created_tmp_disk_tables
            ));
        }

        let mut report = self
            .report(entity, status, messages)
            .with_data("exec_count", summary.exec_count);
        if !query.tables.is_empty() {
            let tables: Vec<String> = query
                .tables
                .values()
                .map(|table| match &table.schema {
                    Some(schema) => format!("{}.{}", schema, table.table),
                    None => table.table.clone(),
                })
                .collect();
            report = report.with_data("tables", tables);
        }

        Ok(Some(report))
    }
}
