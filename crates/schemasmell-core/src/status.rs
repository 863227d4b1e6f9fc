//! Status lattice for check results
//!
//! Levels are STABLE: 1 (ok) through 5 (critical).
//! They are persisted in JSON output, so never renumber them.

use serde::{Deserialize, Serialize};

use crate::report::ReportError;

/// Outcome severity of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Nothing to report
    Ok = 1,

    /// Informational, no action needed
    Info = 2,

    /// Worth a look when convenient
    Concern = 3,

    /// Should be fixed
    Warning = 4,

    /// Must be fixed
    Critical = 5,
}

impl Status {
    /// All statuses, lowest first
    pub const ALL: [Status; 5] = [
        Status::Ok,
        Status::Info,
        Status::Concern,
        Status::Warning,
        Status::Critical,
    ];

    /// Numeric level in `1..=5`
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Build a status from its numeric level
    pub fn from_level(level: u8) -> Result<Self, ReportError> {
        match level {
            1 => Ok(Self::Ok),
            2 => Ok(Self::Info),
            3 => Ok(Self::Concern),
            4 => Ok(Self::Warning),
            5 => Ok(Self::Critical),
            other => Err(ReportError::InvalidStatus(other)),
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::Info => "Info",
            Self::Concern => "Concern",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }

    /// Parse a label, ignoring case
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl TryFrom<u8> for Status {
    type Error = ReportError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::from_level(level)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Ok
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
