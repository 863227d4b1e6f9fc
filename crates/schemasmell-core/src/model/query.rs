//! Query entity (a normalized statement digest)

use serde::{Deserialize, Serialize};
use sqlparser::ast::Statement;
use std::collections::BTreeMap;

/// A table a query reads, resolved from its alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReference {
    #[serde(default)]
    pub schema: Option<String>,
    pub table: String,
}

/// Projection of `performance_schema.events_statements_summary_by_digest`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySummary {
    pub exec_count: u64,
    pub rows_examined: u64,
    pub rows_sent: u64,
    pub select_scan: u64,
    pub no_index_used: u64,
    pub no_good_index_used: u64,
    pub sort_scan: u64,
    pub created_tmp_tables: u64,
    pub created_tmp_disk_tables: u64,
}

impl QuerySummary {
    /// Share of executions a counter applies to
    pub fn per_execution(&self, count: u64) -> f64 {
        if self.exec_count == 0 {
            return 0.0;
        }
        count as f64 / self.exec_count as f64
    }

    /// Rows examined for every row returned
    pub fn examined_per_sent(&self) -> Option<f64> {
        if self.rows_sent == 0 {
            return None;
        }
        Some(self.rows_examined as f64 / self.rows_sent as f64)
    }
}

/// A statement digest with its parsed form and runtime summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub digest: Option<String>,

    pub digest_text: String,

    #[serde(default)]
    pub schema_name: Option<String>,

    /// Parsed statements; empty when the digest could not be parsed
    #[serde(skip)]
    pub tree: Vec<Statement>,

    /// Alias (or bare table name) to table
    #[serde(default)]
    pub tables: BTreeMap<String, TableReference>,

    #[serde(default)]
    pub summary: QuerySummary,
}

impl Query {
    pub fn new(digest_text: impl Into<String>, summary: QuerySummary) -> Self {
        Self {
            digest: None,
            digest_text: digest_text.into(),
            schema_name: None,
            tree: Vec::new(),
            tables: BTreeMap::new(),
            summary,
        }
    }

    pub fn is_parsed(&self) -> bool {
        !self.tree.is_empty()
    }

    /// Digest text cut to `max` characters for display
    pub fn short_text(&self, max: usize) -> String {
        let text: String = self.digest_text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().count() <= max {
            return text;
        }
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
