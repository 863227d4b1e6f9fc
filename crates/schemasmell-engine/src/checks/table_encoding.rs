//! Table default collations outside utf8mb4

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

pub struct TableEncoding;

impl Check for TableEncoding {
    fn name(&self) -> &'static str {
        "table_encoding"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity
            .as_table()
            .is_some_and(|table| table.is_base_table() && table.info.table_collation.is_some())
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(collation) = entity
            .as_table()
            .and_then(|table| table.info.table_collation.as_deref())
        else {
            return Ok(None);
        };

        let report = if collation.to_ascii_lowercase().starts_with("utf8mb4_") {
            self.report(entity, Status::Ok, vec![])
        } else {
            self.report(
                entity,
                Status::Concern,
                vec![format!(
                    "Table {} defaults to {}; utf8mb4 covers all of Unicode",
                    entity.name(),
                    collation
                )],
            )
        };

        Ok(Some(report.with_data("collation", collation)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::{status, table};

    #[test]
    fn latin1_default_is_a_concern() {
        let t = table("CREATE TABLE t (a INT)");
        assert_eq!(status(&TableEncoding, &Entity::Table(&t)), Some(Status::Concern));
    }

    #[test]
    fn utf8mb4_is_ok() {
        let t = table("CREATE TABLE t (a INT) DEFAULT CHARSET=utf8mb4");
        assert_eq!(status(&TableEncoding, &Entity::Table(&t)), Some(Status::Ok));

        let t = table("CREATE TABLE t (a INT) COLLATE=utf8mb4_bin");
        assert_eq!(status(&TableEncoding, &Entity::Table(&t)), Some(Status::Ok));
    }
}
