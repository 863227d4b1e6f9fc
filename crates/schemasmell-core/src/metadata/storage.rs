//! On-disk storage sizes and integer capacities
//!
//! Sizes follow the "Data Type Storage Requirements" chapter of the MySQL
//! manual. String lengths are taken as bytes.

use super::types::canonical_type_name;
use super::MetadataError;

/// Bytes used by one value: payload plus length header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageSize {
    pub body: u64,
    pub header: u64,
}

impl StorageSize {
    const fn fixed(body: u64) -> Self {
        Self { body, header: 0 }
    }

    pub fn total(&self) -> u64 {
        self.body + self.header
    }
}

/// Leftover digit bytes for DECIMAL, indexed by digit count
const DECIMAL_LEFTOVER: [u64; 10] = [0, 1, 1, 2, 2, 3, 3, 4, 4, 4];

fn decimal_digits(digits: u64) -> u64 {
    (digits / 9) * 4 + DECIMAL_LEFTOVER[(digits % 9) as usize]
}

fn fractional_seconds(fsp: Option<u64>) -> u64 {
    fsp.map(|fsp| (fsp + 1) / 2).unwrap_or(0)
}

fn variable_length(length: u64) -> StorageSize {
    StorageSize {
        body: length,
        header: if length < 256 { 1 } else { 2 },
    }
}

/// Storage size of one value
///
/// `length` is the declared length, precision or fsp; for ENUM and SET it is
/// the number of members. `scale` only matters for DECIMAL.
pub fn storage_size(
    data_type: &str,
    length: Option<u64>,
    scale: Option<u64>,
) -> Result<StorageSize, MetadataError> {
    let size = match canonical_type_name(data_type).as_str() {
        "tinyint" => StorageSize::fixed(1),
        "smallint" => StorageSize::fixed(2),
        "mediumint" => StorageSize::fixed(3),
        "int" => StorageSize::fixed(4),
        "bigint" => StorageSize::fixed(8),
        "float" => StorageSize::fixed(if length.unwrap_or(0) > 24 { 8 } else { 4 }),
        "double" => StorageSize::fixed(8),
        "decimal" => {
            let precision = length.unwrap_or(10);
            let scale = scale.unwrap_or(0).min(precision);
            StorageSize::fixed(decimal_digits(precision - scale) + decimal_digits(scale))
        }
        "bit" => StorageSize::fixed((length.unwrap_or(1) + 7) / 8),
        "year" => StorageSize::fixed(1),
        "date" => StorageSize::fixed(3),
        "time" => StorageSize::fixed(3 + fractional_seconds(length)),
        "datetime" => StorageSize::fixed(5 + fractional_seconds(length)),
        "timestamp" => StorageSize::fixed(4 + fractional_seconds(length)),
        "char" | "binary" => StorageSize::fixed(length.unwrap_or(1)),
        "varchar" | "varbinary" => variable_length(length.unwrap_or(0)),
        "tinytext" | "tinyblob" => StorageSize { body: 255, header: 1 },
        "text" | "blob" => StorageSize { body: 65_535, header: 2 },
        "mediumtext" | "mediumblob" => StorageSize { body: 16_777_215, header: 3 },
        "longtext" | "longblob" | "json" => StorageSize { body: 4_294_967_295, header: 4 },
        "enum" => StorageSize::fixed(if length.unwrap_or(0) <= 255 { 1 } else { 2 }),
        "set" => {
            let bytes = match (length.unwrap_or(0) + 7) / 8 {
                0 | 1 => 1,
                2 => 2,
                3 => 3,
                4 => 4,
                _ => 8,
            };
            StorageSize::fixed(bytes)
        }
        _ => return Err(MetadataError::UnknownColumnType(data_type.to_string())),
    };

    Ok(size)
}

/// Largest value an integer column can hold
///
/// Unsigned capacity is the signed maximum doubled plus one.
pub fn max_value(data_type: &str, unsigned: bool) -> Result<u64, MetadataError> {
    let signed_max: u64 = match canonical_type_name(data_type).as_str() {
        "tinyint" => 127,
        "smallint" => 32_767,
        "mediumint" => 8_388_607,
        "int" => 2_147_483_647,
        "bigint" => 9_223_372_036_854_775_807,
        _ => return Err(MetadataError::InvalidColumnType(data_type.to_string())),
    };

    Ok(if unsigned { signed_max * 2 + 1 } else { signed_max })
}
