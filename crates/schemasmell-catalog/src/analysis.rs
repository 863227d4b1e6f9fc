//! Facts derived from a built catalog
//!
//! Fills the optional [`TableFacts`](schemasmell_core::TableFacts) a live
//! server would otherwise report. Facts that are already present (from a
//! snapshot) are left alone.

use schemasmell_core::{AutoIncrementUsage, Database, Index, RedundantIndex, Table};
use tracing::debug;

/// Derive facts for every table of the database
pub fn derive_facts(database: &mut Database) {
    for schema in database.schemas_mut() {
        for table in schema.tables_mut() {
            annotate_table(table);
        }
    }
}

/// Derive auto-increment usage and redundant indexes for one table
pub fn annotate_table(table: &mut Table) {
    if table.facts.auto_increment.is_none() {
        table.facts.auto_increment = auto_increment_usage(table);
    }

    if table.facts.redundant_indexes.is_none() && !table.is_virtual() {
        let redundant = redundant_indexes(table);
        if !redundant.is_empty() {
            debug!(
                table = %table.qualified_name(),
                count = redundant.len(),
                "redundant indexes found"
            );
        }
        table.facts.redundant_indexes = Some(redundant);
    }
}

/// Usage of the table's auto-increment counter, if it has one
///
/// Columns whose type has no integer capacity yield `None`.
pub fn auto_increment_usage(table: &Table) -> Option<AutoIncrementUsage> {
    let column = table.auto_increment_column()?;
    let max_value = column.max_value().ok()?;

    Some(AutoIncrementUsage {
        column_name: column.name.clone(),
        data_type: column.info.data_type.clone(),
        unsigned: column.is_unsigned(),
        max_value,
        auto_increment: table.info.auto_increment.unwrap_or(1),
    })
}

/// Key parts compared case-insensitively, prefix lengths included
fn key_parts(index: &Index) -> Vec<(String, Option<u64>)> {
    index
        .statistics
        .iter()
        .map(|s| (s.column_name.to_ascii_lowercase(), s.sub_part))
        .collect()
}

/// Whether `candidate` is made unnecessary by `dominant`
///
/// `candidate_first` tells which one was declared first, to break ties
/// between exact duplicates.
fn is_dominated_by(candidate: &Index, dominant: &Index, candidate_first: bool) -> bool {
    if candidate.is_primary() {
        return false;
    }
    if !candidate.index_type.eq_ignore_ascii_case(&dominant.index_type) {
        return false;
    }

    let candidate_parts = key_parts(candidate);
    let dominant_parts = key_parts(dominant);
    if candidate_parts.is_empty() || candidate_parts.len() > dominant_parts.len() {
        return false;
    }
    if !dominant_parts.starts_with(&candidate_parts) {
        return false;
    }

    if candidate_parts.len() < dominant_parts.len() {
        // A unique prefix enforces something the longer index does not
        return !candidate.unique;
    }

    if dominant.is_primary() {
        return true;
    }
    match (candidate.unique, dominant.unique) {
        (false, true) => true,
        (true, false) => false,
        _ => !candidate_first,
    }
}

/// Indexes covered by a left prefix of another index on the same table
pub fn redundant_indexes(table: &Table) -> Vec<RedundantIndex> {
    let indexes = table.indexes();
    let mut redundant = Vec::new();

    for (i, candidate) in indexes.iter().enumerate() {
        let dominant = indexes
            .iter()
            .enumerate()
            .find(|(j, other)| *j != i && is_dominated_by(candidate, other, i < *j));

        if let Some((_, dominant)) = dominant {
            redundant.push(RedundantIndex {
                redundant_index: candidate.name.clone(),
                redundant_columns: column_names(candidate),
                redundant_is_unique: candidate.unique,
                dominant_index: dominant.name.clone(),
                dominant_columns: column_names(dominant),
            });
        }
    }

    redundant
}

fn column_names(index: &Index) -> Vec<String> {
    index.column_names().into_iter().map(str::to_string).collect()
}
