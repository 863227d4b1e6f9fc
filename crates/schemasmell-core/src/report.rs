//! Report model
//!
//! A report is the immutable outcome of running one check against one entity.
//! The JSON layout is STABLE: add fields, never rename them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::status::Status;

/// Kind of catalog entity a report talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Database,
    Schema,
    Table,
    Column,
    Index,
    Account,
    Query,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Database => "database",
            Self::Schema => "schema",
            Self::Table => "table",
            Self::Column => "column",
            Self::Index => "index",
            Self::Account => "account",
            Self::Query => "query",
        };
        f.write_str(name)
    }
}

/// Identifies the entity a report was produced for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity kind
    pub kind: EntityKind,

    /// Qualified name, e.g. `shop.orders.id`
    pub name: String,
}

impl EntityDescriptor {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for EntityDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Report construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid status level {0}, expected 1..=5")]
    InvalidStatus(u8),
}

/// Outcome of one check on one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    check: String,
    entity: EntityDescriptor,
    status: Status,
    messages: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<String, serde_json::Value>,
}

impl Report {
    /// Create a report from a raw severity level
    ///
    /// Fails with [`ReportError::InvalidStatus`] when `level` is outside `1..=5`.
    pub fn new(
        check: impl Into<String>,
        entity: EntityDescriptor,
        level: u8,
        messages: Vec<String>,
    ) -> Result<Self, ReportError> {
        let status = Status::from_level(level)?;
        Ok(Self::with_status(check, entity, status, messages))
    }

    /// Create a report from an already validated status
    pub fn with_status(
        check: impl Into<String>,
        entity: EntityDescriptor,
        status: Status,
        messages: Vec<String>,
    ) -> Self {
        Self {
            check: check.into(),
            entity,
            status,
            messages,
            data: BTreeMap::new(),
        }
    }

    /// Attach a structured datum
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn check(&self) -> &str {
        &self.check
    }

    pub fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn data(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.data
    }

    /// Copy of this report with a different status
    ///
    /// Used by renderers applying configured overrides; the original is untouched.
    pub fn overridden(&self, status: Status) -> Self {
        let mut report = self.clone();
        report.status = status;
        report
    }
}

/// Per-status counts over a list of reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub ok: usize,
    pub info: usize,
    pub concern: usize,
    pub warning: usize,
    pub critical: usize,
}

impl ReportSummary {
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.add(report.status());
        }
        summary
    }

    pub fn add(&mut self, status: Status) {
        match status {
            Status::Ok => self.ok += 1,
            Status::Info => self.info += 1,
            Status::Concern => self.concern += 1,
            Status::Warning => self.warning += 1,
            Status::Critical => self.critical += 1,
        }
        self.total += 1;
    }

    /// Highest status seen, if any
    pub fn worst(&self) -> Option<Status> {
        [
            (Status::Critical, self.critical),
            (Status::Warning, self.warning),
            (Status::Concern, self.concern),
            (Status::Info, self.info),
            (Status::Ok, self.ok),
        ]
        .into_iter()
        .find(|(_, count)| *count > 0)
        .map(|(status, _)| status)
    }
}
