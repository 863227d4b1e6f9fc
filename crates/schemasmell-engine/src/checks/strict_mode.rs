//! Non-strict SQL mode on MySQL 8 and later

use schemasmell_core::{Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

const STRICT_MODES: &[&str] = &["STRICT_ALL_TABLES", "STRICT_TRANS_TABLES"];

/// `sql_mode` a MySQL 8 server starts with
const DEFAULT_SQL_MODE: &str = "ONLY_FULL_GROUP_BY,STRICT_TRANS_TABLES,NO_ZERO_IN_DATE,\
NO_ZERO_DATE,ERROR_FOR_DIVISION_BY_ZERO,NO_ENGINE_SUBSTITUTION";

/// Upper-cased, de-duplicated mode names
fn normalize(sql_mode: &str) -> Vec<String> {
    let mut modes: Vec<String> = sql_mode
        .split(',')
        .map(|mode| mode.trim().trim_matches('\'').to_ascii_uppercase())
        .filter(|mode| !mode.is_empty())
        .collect();
    modes.sort();
    modes.dedup();
    modes
}

/// WARNING unless `sql_mode` makes invalid data an error
pub struct StrictMode;

impl Check for StrictMode {
    fn name(&self) -> &'static str {
        "strict_mode"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity
            .as_database()
            .and_then(|database| database.version())
            .is_some_and(|version| version.major >= 8)
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(database) = entity.as_database() else {
            return Ok(None);
        };

        let sql_mode = database.variable("sql_mode").unwrap_or(DEFAULT_SQL_MODE);
        let modes = normalize(sql_mode);
        let strict = modes.iter().any(|mode| STRICT_MODES.contains(&mode.as_str()));

        let report = if strict {
            self.report(entity, Status::Ok, vec![])
        } else {
            self.report(
                entity,
                Status::Warning,
                vec!["sql_mode has neither STRICT_TRANS_TABLES nor STRICT_ALL_TABLES; invalid values are silently adjusted".to_string()],
            )
        };

        Ok(Some(report.with_data("sql_mode", modes.join(","))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::status;
    use schemasmell_core::Database;

    fn database(version: &str, sql_mode: Option<&str>) -> Database {
        let mut database = Database::new("db1");
        database.set_variable("version", version);
        if let Some(sql_mode) = sql_mode {
            database.set_variable("sql_mode", sql_mode);
        }
        database
    }

    #[test]
    fn missing_strict_flag_warns() {
        let db = database("8.0.36", Some("NO_ENGINE_SUBSTITUTION"));
        assert_eq!(status(&StrictMode, &Entity::Database(&db)), Some(Status::Warning));

        let db = database("8.0.36", Some(""));
        assert_eq!(status(&StrictMode, &Entity::Database(&db)), Some(Status::Warning));
    }

    #[test]
    fn strict_flags_are_normalized() {
        let db = database("8.4.0", Some("no_engine_substitution, strict_all_tables"));
        assert_eq!(status(&StrictMode, &Entity::Database(&db)), Some(Status::Ok));
    }

    #[test]
    fn server_default_is_strict() {
        let db = database("8.0.36", None);
        assert_eq!(status(&StrictMode, &Entity::Database(&db)), Some(Status::Ok));
    }

    #[test]
    fn older_or_unknown_versions_are_skipped() {
        let db = database("5.7.44", Some(""));
        assert_eq!(status(&StrictMode, &Entity::Database(&db)), None);
        assert_eq!(status(&StrictMode, &Entity::Database(&Database::new("db1"))), None);
    }
}
