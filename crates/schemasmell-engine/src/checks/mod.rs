//! Check library
//!
//! One rule per module. [`all`] returns every rule in the order reports are
//! produced for an entity.

mod auto_increment_capacity;
mod empty_table;
mod index_prefix;
mod low_cardinality_storage;
mod passwordless_account;
mod primary_key;
mod query_inefficiency;
mod redundant_indexes;
mod sane_innodb_primary_key;
mod strict_mode;
mod super_privilege;
mod table_encoding;
mod uuid_storage;
mod version_support;

pub use auto_increment_capacity::AutoIncrementCapacity;
pub use empty_table::EmptyTable;
pub use index_prefix::IndexPrefix;
pub use low_cardinality_storage::LowCardinalityStorage;
pub use passwordless_account::PasswordlessAccount;
pub use primary_key::PrimaryKey;
pub use query_inefficiency::QueryInefficiency;
pub use redundant_indexes::RedundantIndexes;
pub use sane_innodb_primary_key::SaneInnoDbPrimaryKey;
pub use strict_mode::StrictMode;
pub use super_privilege::SuperPrivilege;
pub use table_encoding::TableEncoding;
pub use uuid_storage::UuidStorage;
pub use version_support::VersionSupport;

use crate::check::Check;

/// Every built-in check
pub fn all() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(StrictMode),
        Box::new(VersionSupport::new()),
        Box::new(SuperPrivilege),
        Box::new(PasswordlessAccount),
        Box::new(PrimaryKey),
        Box::new(AutoIncrementCapacity),
        Box::new(RedundantIndexes),
        Box::new(SaneInnoDbPrimaryKey),
        Box::new(EmptyTable),
        Box::new(TableEncoding),
        Box::new(LowCardinalityStorage),
        Box::new(IndexPrefix),
        Box::new(UuidStorage),
        Box::new(QueryInefficiency),
    ]
}

/// Names of the built-in checks
pub fn names() -> Vec<&'static str> {
    all().iter().map(|check| check.name()).collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use schemasmell_catalog::build_catalog;
    use schemasmell_core::{Report, Status, Table};

    use crate::check::Check;
    use crate::entity::Entity;

    /// First table built from a script
    pub fn table(script: &str) -> Table {
        let database = build_catalog("test", script).unwrap();
        database.schemas()[0].tables()[0].clone()
    }

    /// Run a check the way the orchestrator does
    pub fn run(check: &dyn Check, entity: &Entity<'_>) -> Option<Report> {
        if !check.supports(entity) {
            return None;
        }
        check.run(entity).unwrap()
    }

    pub fn status(check: &dyn Check, entity: &Entity<'_>) -> Option<Status> {
        run(check, entity).map(|report| report.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names = names();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.len(), 14);
    }
}
