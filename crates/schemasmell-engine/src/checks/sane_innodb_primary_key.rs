//! Wide InnoDB primary keys copied into every secondary index

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// Primary keys up to this many bytes are always fine
const NARROW_KEY_BYTES: u64 = 8;

/// Size of the surrogate `INT UNSIGNED` key suggested instead
const SURROGATE_KEY_BYTES: u64 = 4;

/// Compare the cost of a wide primary key against a surrogate key
///
/// InnoDB appends the primary key to every secondary index entry. Replacing a
/// wide key by a 4-byte surrogate keeps the old key as a unique secondary
/// index (`pk_size + 4` bytes) and shrinks every other index to 4 extra bytes.
pub struct SaneInnoDbPrimaryKey;

impl Check for SaneInnoDbPrimaryKey {
    fn name(&self) -> &'static str {
        "sane_innodb_primary_key"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity
            .as_table()
            .is_some_and(|table| table.is_innodb() && table.primary_key().is_some())
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(table) = entity.as_table() else {
            return Ok(None);
        };

        let mut pk_size = 0;
        for column in table.primary_key_columns() {
            pk_size += column.storage_size()?.total();
        }
        let count = table.secondary_indexes().count() as u64;

        if pk_size <= NARROW_KEY_BYTES || count == 0 {
            return Ok(Some(
                self.report(entity, Status::Ok, vec![])
                    .with_data("pk_size", pk_size),
            ));
        }

        let current = pk_size + count * pk_size;
        let surrogate = SURROGATE_KEY_BYTES + (pk_size + SURROGATE_KEY_BYTES) + count * SURROGATE_KEY_BYTES;

        let (status, messages) = if current > surrogate {
            (
                Status::Warning,
                vec![format!(
                    "Primary key of {} is {} bytes and is copied into {} secondary index(es); \
                     a surrogate key would cost {} bytes per row instead of {}",
                    table.qualified_name(),
                    pk_size,
                    count,
                    surrogate,
                    current
                )],
            )
        } else {
            (Status::Ok, vec![])
        };

        Ok(Some(
            self.report(entity, status, messages)
                .with_data("pk_size", pk_size)
                .with_data("current_cost", current)
                .with_data("surrogate_cost", surrogate),
        ))
    }
}
