//! Redundant and unused indexes

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// CONCERN when redundant or unused index facts name any index of the table
///
/// Redundant indexes come from the catalog analysis or a snapshot; unused
/// ones only from a live server's usage statistics. A table with neither
/// fact attached is OK.
pub struct RedundantIndexes;

impl Check for RedundantIndexes {
    fn name(&self) -> &'static str {
        "redundant_indexes"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity.as_table().is_some_and(|table| table.is_base_table())
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(table) = entity.as_table() else {
            return Ok(None);
        };
        let facts = &table.facts;

        let mut messages = Vec::new();
        for redundant in facts.redundant_indexes.iter().flatten() {
            let kind = if redundant.redundant_is_unique {
                "Unique index"
            } else {
                "Index"
            };
            messages.push(format!(
                "{} {} ({}) is redundant with {} ({})",
                kind,
                redundant.redundant_index,
                redundant.redundant_columns.join(", "),
                redundant.dominant_index,
                redundant.dominant_columns.join(", ")
            ));
        }
        for unused in facts.unused_indexes.iter().flatten() {
            messages.push(format!("Index {} is never used", unused));
        }

        let status = if messages.is_empty() {
            Status::Ok
        } else {
            Status::Concern
        };
        Ok(Some(self.report(entity, status, messages)))
    }
}
