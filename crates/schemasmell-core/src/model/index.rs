//! Index entity

use serde::{Deserialize, Serialize};

/// Name MySQL gives every primary key
pub const PRIMARY_INDEX: &str = "PRIMARY";

/// One column of an index (`information_schema.STATISTICS` row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub column_name: String,

    /// 1-based position in the index
    pub seq_in_index: u32,

    /// Prefix length for partially indexed string columns
    #[serde(default)]
    pub sub_part: Option<u64>,
}

/// A table index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,

    #[serde(default)]
    pub table_name: String,

    #[serde(default)]
    pub schema_name: String,

    pub unique: bool,

    /// BTREE, FULLTEXT, SPATIAL, HASH
    #[serde(default = "default_index_type")]
    pub index_type: String,

    #[serde(default)]
    pub statistics: Vec<Statistics>,
}

fn default_index_type() -> String {
    "BTREE".to_string()
}

impl Index {
    pub fn new(name: impl Into<String>, unique: bool) -> Self {
        Self {
            name: name.into(),
            table_name: String::new(),
            schema_name: String::new(),
            unique,
            index_type: default_index_type(),
            statistics: Vec::new(),
        }
    }

    /// Append a column, numbering it after the existing ones
    pub fn push_column(&mut self, column_name: impl Into<String>, sub_part: Option<u64>) {
        let seq_in_index = self.statistics.len() as u32 + 1;
        self.statistics.push(Statistics {
            column_name: column_name.into(),
            seq_in_index,
            sub_part,
        });
    }

    pub fn is_primary(&self) -> bool {
        self.name == PRIMARY_INDEX
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.statistics.iter().map(|s| s.column_name.as_str()).collect()
    }

    pub fn contains_column(&self, column_name: &str) -> bool {
        self.statistics
            .iter()
            .any(|s| s.column_name.eq_ignore_ascii_case(column_name))
    }

    /// `schema.table.index`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.schema_name, self.table_name, self.name)
    }
}
