//! Character set defaults (as listed by `SHOW CHARACTER SET` on MySQL 8.0)

use super::MetadataError;

/// (charset, default collation)
const CHARSETS: &[(&str, &str)] = &[
    ("armscii8", "armscii8_general_ci"),
    ("ascii", "ascii_general_ci"),
    ("big5", "big5_chinese_ci"),
    ("binary", "binary"),
    ("cp1250", "cp1250_general_ci"),
    ("cp1251", "cp1251_general_ci"),
    ("cp1256", "cp1256_general_ci"),
    ("cp1257", "cp1257_general_ci"),
    ("cp850", "cp850_general_ci"),
    ("cp852", "cp852_general_ci"),
    ("cp866", "cp866_general_ci"),
    ("cp932", "cp932_japanese_ci"),
    ("dec8", "dec8_swedish_ci"),
    ("eucjpms", "eucjpms_japanese_ci"),
    ("euckr", "euckr_korean_ci"),
    ("gb18030", "gb18030_chinese_ci"),
    ("gb2312", "gb2312_chinese_ci"),
    ("gbk", "gbk_chinese_ci"),
    ("geostd8", "geostd8_general_ci"),
    ("greek", "greek_general_ci"),
    ("hebrew", "hebrew_general_ci"),
    ("hp8", "hp8_english_ci"),
    ("keybcs2", "keybcs2_general_ci"),
    ("koi8r", "koi8r_general_ci"),
    ("koi8u", "koi8u_general_ci"),
    ("latin1", "latin1_swedish_ci"),
    ("latin2", "latin2_general_ci"),
    ("latin5", "latin5_turkish_ci"),
    ("latin7", "latin7_general_ci"),
    ("macce", "macce_general_ci"),
    ("macroman", "macroman_general_ci"),
    ("sjis", "sjis_japanese_ci"),
    ("swe7", "swe7_swedish_ci"),
    ("tis620", "tis620_thai_ci"),
    ("ucs2", "ucs2_general_ci"),
    ("ujis", "ujis_japanese_ci"),
    ("utf16", "utf16_general_ci"),
    ("utf16le", "utf16le_general_ci"),
    ("utf32", "utf32_general_ci"),
    ("utf8", "utf8_general_ci"),
    ("utf8mb3", "utf8mb3_general_ci"),
    ("utf8mb4", "utf8mb4_0900_ai_ci"),
];

fn lookup(charset: &str) -> Option<&'static (&'static str, &'static str)> {
    let charset = charset.trim().to_ascii_lowercase();
    CHARSETS.iter().find(|(name, _)| *name == charset)
}

/// Canonical default collation of a character set
pub fn default_collation(charset: &str) -> Result<&'static str, MetadataError> {
    lookup(charset)
        .map(|(_, collation)| *collation)
        .ok_or_else(|| MetadataError::UnknownCharacterSet(charset.to_string()))
}

/// Character set a collation belongs to
///
/// Collation names are prefixed with their character set (`utf8mb4_bin`),
/// except `binary` which is both.
pub fn charset_for_collation(collation: &str) -> Result<&'static str, MetadataError> {
    let collation = collation.trim().to_ascii_lowercase();
    let prefix = collation.split('_').next().unwrap_or_default();

    lookup(prefix)
        .filter(|(name, _)| collation == *name || collation.len() > name.len())
        .map(|(name, _)| *name)
        .ok_or(MetadataError::UnknownCollation(collation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_collations() {
        assert_eq!(default_collation("latin1").unwrap(), "latin1_swedish_ci");
        assert_eq!(default_collation("ASCII").unwrap(), "ascii_general_ci");
        assert_eq!(default_collation("utf8mb4").unwrap(), "utf8mb4_0900_ai_ci");
    }

    #[test]
    fn unknown_charset_fails() {
        assert_eq!(
            default_collation("klingon"),
            Err(MetadataError::UnknownCharacterSet("klingon".to_string()))
        );
    }

    #[test]
    fn collation_prefix_resolves_charset() {
        assert_eq!(charset_for_collation("utf8mb4_unicode_ci").unwrap(), "utf8mb4");
        assert_eq!(charset_for_collation("ascii_bin").unwrap(), "ascii");
        assert_eq!(charset_for_collation("binary").unwrap(), "binary");
        assert!(matches!(
            charset_for_collation("nope_ci"),
            Err(MetadataError::UnknownCollation(_))
        ));
    }
}
