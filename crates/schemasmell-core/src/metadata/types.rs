//! Column type classification

use serde::{Deserialize, Serialize};

/// Coarse family of a MySQL data type
///
/// Decides which information-schema precision field a declared length fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeClass {
    /// `numeric_precision`
    Integer,

    /// `numeric_precision` and `numeric_scale`
    OtherNumeric,

    /// `character_maximum_length` and `character_octet_length`
    String,

    /// `datetime_precision`
    Time,

    /// `character_maximum_length` (bytes)
    Binary,
}

/// Map type aliases to the name MySQL reports in `information_schema`
pub fn canonical_type_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    let collapsed = lower.split_whitespace().collect::<Vec<_>>().join(" ");

    let canonical = match collapsed.as_str() {
        "integer" | "int4" => "int",
        "int1" | "bool" | "boolean" => "tinyint",
        "int2" => "smallint",
        "int3" | "middleint" => "mediumint",
        "int8" => "bigint",
        "dec" | "numeric" | "fixed" => "decimal",
        "real" | "double precision" | "float8" => "double",
        "float4" => "float",
        "character" | "nchar" | "national char" | "national character" => "char",
        "character varying" | "nvarchar" | "national varchar" | "national character varying"
        | "char varying" => "varchar",
        "long varchar" | "long" => "mediumtext",
        "long varbinary" => "mediumblob",
        other => other,
    };

    canonical.to_string()
}

/// Classify a (canonical or alias) type name
pub fn classify(type_name: &str) -> Option<TypeClass> {
    let class = match canonical_type_name(type_name).as_str() {
        "tinyint" | "smallint" | "mediumint" | "int" | "bigint" => TypeClass::Integer,
        "decimal" | "float" | "double" | "bit" => TypeClass::OtherNumeric,
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum" | "set" => {
            TypeClass::String
        }
        "date" | "time" | "datetime" | "timestamp" | "year" => TypeClass::Time,
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => {
            TypeClass::Binary
        }
        _ => return None,
    };

    Some(class)
}
