//! Server versions past or near end of life

use chrono::{Months, NaiveDate, Utc};
use schemasmell_core::{MysqlVersion, Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// End of extended support per release series (major, minor, year, month, day)
const END_OF_LIFE: &[(u32, u32, i32, u32, u32)] = &[
    (5, 5, 2018, 12, 3),
    (5, 6, 2021, 2, 5),
    (5, 7, 2023, 10, 21),
    (8, 0, 2026, 4, 30),
    (8, 4, 2032, 4, 30),
];

/// Warn this long before the end of life
const WARNING_MONTHS: u32 = 6;

fn end_of_life(version: MysqlVersion) -> Option<NaiveDate> {
    END_OF_LIFE
        .iter()
        .find(|(major, minor, ..)| *major == version.major && *minor == version.minor)
        .and_then(|(_, _, year, month, day)| NaiveDate::from_ymd_opt(*year, *month, *day))
}

/// Compare the server's release series against its end-of-life date
pub struct VersionSupport {
    today: NaiveDate,
}

impl VersionSupport {
    pub fn new() -> Self {
        Self::at(Utc::now().date_naive())
    }

    /// Evaluate as of a fixed date
    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Default for VersionSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for VersionSupport {
    fn name(&self) -> &'static str {
        "version_support"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity.as_database().is_some()
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(database) = entity.as_database() else {
            return Ok(None);
        };

        let Some(version) = database.version() else {
            return Ok(Some(self.report(
                entity,
                Status::Concern,
                vec!["Server version is unknown".to_string()],
            )));
        };
        let Some(eol) = end_of_life(version) else {
            return Ok(Some(
                self.report(
                    entity,
                    Status::Concern,
                    vec![format!("No support information for MySQL {}", version)],
                )
                .with_data("version", version.to_string()),
            ));
        };

        let warn_from = eol
            .checked_sub_months(Months::new(WARNING_MONTHS))
            .unwrap_or(eol);
        let (status, messages) = if self.today > eol {
            (
                Status::Critical,
                vec![format!("MySQL {} reached end of life on {}", version, eol)],
            )
        } else if self.today >= warn_from {
            (
                Status::Warning,
                vec![format!("MySQL {} reaches end of life on {}", version, eol)],
            )
        } else {
            (Status::Ok, vec![])
        };

        Ok(Some(
            self.report(entity, status, messages)
                .with_data("version", version.to_string())
                .with_data("end_of_life", eol.to_string()),
        ))
    }
}
