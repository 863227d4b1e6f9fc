//! Check trait and errors

use schemasmell_core::{MetadataError, Report, ReportError, Status};

use crate::entity::Entity;

/// Check failures
///
/// A check fails instead of reporting when the facts it needs were never
/// gathered; reporting OK in that case would hide the gap.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckError {
    #[error("{check}: {fact} not available for {entity}")]
    DataUnavailable {
        check: String,
        entity: String,
        fact: String,
    },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// A rule inspecting one entity at a time
///
/// `supports` only looks at the shape of the entity (kind, engine, version);
/// `run` is never called when it returns false. `run` returns `Ok(None)` when
/// the rule has nothing to say, which is different from an OK report.
pub trait Check {
    /// Stable name used in reports and configuration
    fn name(&self) -> &'static str;

    fn supports(&self, entity: &Entity<'_>) -> bool;

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError>;

    /// Report for `entity` from this check
    fn report(&self, entity: &Entity<'_>, status: Status, messages: Vec<String>) -> Report {
        Report::with_status(self.name(), entity.descriptor(), status, messages)
    }

    fn unavailable(&self, entity: &Entity<'_>, fact: &str) -> CheckError {
        CheckError::DataUnavailable {
            check: self.name().to_string(),
            entity: entity.name(),
            fact: fact.to_string(),
        }
    }
}
