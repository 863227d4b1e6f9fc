//! UUIDs stored as text

use regex::Regex;
use schemasmell_core::{Report, Status};
use std::sync::OnceLock;

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// `id`, `uuid`, `user_id`, `order_uuid`, ...
fn looks_like_identifier(name: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)(^|_)u?u?id$").ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name))
}

/// UUIDs belong in BINARY(16), not in 36 characters of text
///
/// Only columns whose name and shape both suggest a UUID get a report.
pub struct UuidStorage;

impl Check for UuidStorage {
    fn name(&self) -> &'static str {
        "uuid_storage"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity.as_column().is_some()
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some((_, column)) = entity.as_column() else {
            return Ok(None);
        };
        if !looks_like_identifier(&column.name) {
            return Ok(None);
        }

        let length = column.declared_length();
        let report = match (column.info.data_type.as_str(), length) {
            ("binary", Some(16)) => self.report(entity, Status::Ok, vec![]),
            ("char" | "varchar", Some(34 | 36)) => self.report(
                entity,
                Status::Concern,
                vec![format!(
                    "{} looks like a UUID stored as {}; BINARY(16) takes less than half the space",
                    column.qualified_name(),
                    column.info.column_type
                )],
            ),
            _ => return Ok(None),
        };

        Ok(Some(report))
    }
}
