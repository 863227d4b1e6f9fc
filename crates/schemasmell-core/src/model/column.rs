//! Column entity

use serde::{Deserialize, Serialize};

use crate::metadata::{self, MetadataError, StorageSize, TypeClass};

/// `information_schema.COLUMNS.COLUMN_KEY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnKey {
    #[default]
    #[serde(rename = "")]
    None,

    #[serde(rename = "PRI")]
    Primary,

    #[serde(rename = "UNI")]
    Unique,

    #[serde(rename = "MUL")]
    Multiple,
}

impl ColumnKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Primary => "PRI",
            Self::Unique => "UNI",
            Self::Multiple => "MUL",
        }
    }
}

/// Projection of `information_schema.COLUMNS`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnInfo {
    pub ordinal_position: u32,
    pub column_default: Option<String>,
    pub is_nullable: bool,
    pub data_type: String,
    pub character_maximum_length: Option<u64>,
    pub character_octet_length: Option<u64>,
    pub numeric_precision: Option<u64>,
    pub numeric_scale: Option<u64>,
    pub datetime_precision: Option<u64>,
    pub character_set_name: Option<String>,
    pub collation_name: Option<String>,
    pub column_type: String,
    pub column_key: ColumnKey,
    pub extra: String,
    pub generation_expression: String,
    pub column_comment: String,
}

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    /// Owning table (lookup key)
    #[serde(default)]
    pub table_name: String,

    /// Owning schema (lookup key)
    #[serde(default)]
    pub schema_name: String,

    #[serde(default)]
    pub info: ColumnInfo,

    /// ENUM / SET members
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    /// Distinct values, when known
    #[serde(default)]
    pub cardinality: u64,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: String::new(),
            schema_name: String::new(),
            info: ColumnInfo::default(),
            members: Vec::new(),
            cardinality: 0,
        }
    }

    /// `schema.table.column`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.schema_name, self.table_name, self.name)
    }

    pub fn is_primary(&self) -> bool {
        self.info.column_key == ColumnKey::Primary
    }

    pub fn is_auto_increment(&self) -> bool {
        self.info.extra.to_ascii_lowercase().contains("auto_increment")
    }

    pub fn is_unsigned(&self) -> bool {
        self.info.column_type.to_ascii_lowercase().contains("unsigned")
    }

    /// Generated column that is computed on read
    pub fn is_virtual(&self) -> bool {
        self.info.extra.to_ascii_uppercase().contains("VIRTUAL GENERATED")
    }

    pub fn type_class(&self) -> Option<TypeClass> {
        metadata::classify(&self.info.data_type)
    }

    pub fn is_string(&self) -> bool {
        self.type_class() == Some(TypeClass::String)
    }

    pub fn is_integer(&self) -> bool {
        self.type_class() == Some(TypeClass::Integer)
    }

    /// Declared length, precision or fsp, whichever the type uses
    pub fn declared_length(&self) -> Option<u64> {
        match self.type_class()? {
            TypeClass::Integer | TypeClass::OtherNumeric => self.info.numeric_precision,
            TypeClass::String | TypeClass::Binary => self.info.character_maximum_length,
            TypeClass::Time => self.info.datetime_precision,
        }
    }

    pub fn storage_size(&self) -> Result<StorageSize, MetadataError> {
        let length = match self.info.data_type.as_str() {
            "enum" | "set" => Some(self.members.len() as u64),
            _ => self.declared_length(),
        };
        metadata::storage_size(&self.info.data_type, length, self.info.numeric_scale)
    }

    /// Capacity of an integer column
    pub fn max_value(&self) -> Result<u64, MetadataError> {
        metadata::max_value(&self.info.data_type, self.is_unsigned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varchar(name: &str, length: u64) -> Column {
        let mut column = Column::new(name);
        column.info.data_type = "varchar".into();
        column.info.column_type = format!("varchar({})", length);
        column.info.character_maximum_length = Some(length);
        column
    }

    #[test]
    fn storage_of_varchar() {
        let column = varchar("email", 255);
        assert!(column.is_string());
        assert_eq!(column.storage_size().unwrap().total(), 256);
    }

    #[test]
    fn enum_storage_uses_member_count() {
        let mut column = Column::new("state");
        column.info.data_type = "enum".into();
        column.members = vec!["new".into(), "paid".into()];
        assert_eq!(column.storage_size().unwrap().total(), 1);
    }

    #[test]
    fn unsigned_capacity() {
        let mut column = Column::new("id");
        column.info.data_type = "int".into();
        column.info.column_type = "int(10) unsigned".into();
        assert!(column.is_unsigned());
        assert_eq!(column.max_value().unwrap(), 4_294_967_295);
        assert!(varchar("name", 10).max_value().is_err());
    }

    #[test]
    fn column_key_serializes_like_information_schema() {
        assert_eq!(serde_json::to_string(&ColumnKey::Primary).unwrap(), "\"PRI\"");
        assert_eq!(serde_json::to_string(&ColumnKey::None).unwrap(), "\"\"");
        assert_eq!(ColumnKey::Multiple.as_str(), "MUL");
    }
}
