//! Query digest parsing with datafusion-sqlparser-rs
//!
//! Digest text is normalized SQL (`?` for literals, `...` for collapsed
//! lists) so it is lightly rewritten before parsing.

use schemasmell_core::Query;
use sqlparser::ast::Statement;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use crate::parser::ParseError;
use crate::resolver::TableResolver;

/// SQL parser for query digests (MySQL dialect)
#[derive(Debug)]
pub struct QueryParser {
    dialect: MySqlDialect,
}

impl QueryParser {
    pub fn new() -> Self {
        Self {
            dialect: MySqlDialect {},
        }
    }

    /// Parse digest text into statements
    pub fn parse(&self, digest_text: &str) -> Result<Vec<Statement>, ParseError> {
        let sql = normalize_digest(digest_text);
        Parser::parse_sql(&self.dialect, &sql).map_err(|e| ParseError::Query {
            line: 1,
            message: e.to_string(),
        })
    }

    /// Fill `tree` and `tables` of a query from its digest text
    ///
    /// An unparseable digest leaves both empty and returns the error.
    pub fn resolve(&self, query: &mut Query) -> Result<(), ParseError> {
        query.tree.clear();
        query.tables.clear();

        let statements = self.parse(&query.digest_text)?;

        let mut resolver = TableResolver::new();
        for statement in &statements {
            resolver.resolve(statement);
        }

        query.tables = resolver.into_tables();
        query.tree = statements;
        Ok(())
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Make digest placeholders parseable
fn normalize_digest(digest_text: &str) -> String {
    digest_text.replace("(...)", "(?)").replace("...", "?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemasmell_core::QuerySummary;

    #[test]
    fn resolve_fills_tree_and_tables() {
        let mut query = Query::new(
            "SELECT `o`.`id` FROM `shop`.`orders` `o` WHERE `o`.`status` IN (...)",
            QuerySummary::default(),
        );

        QueryParser::new().resolve(&mut query).unwrap();

        assert!(query.is_parsed());
        assert_eq!(query.tables["o"].table, "orders");
        assert_eq!(query.tables["o"].schema.as_deref(), Some("shop"));
    }

    #[test]
    fn unparseable_digest_keeps_empty_tree() {
        let mut query = Query::new("SELEC * FORM orders (", QuerySummary::default());
        query.tables.insert(
            "stale".into(),
            schemasmell_core::TableReference {
                schema: None,
                table: "stale".into(),
            },
        );

        let err = QueryParser::new().resolve(&mut query).unwrap_err();
        assert!(matches!(err, ParseError::Query { .. }));
        assert!(!query.is_parsed());
        assert!(query.tables.is_empty());
    }

    #[test]
    fn normalizes_collapsed_lists() {
        assert_eq!(normalize_digest("IN (...)"), "IN (?)");
        assert_eq!(normalize_digest("VALUES (?, ...)"), "VALUES (?, ?)");
    }
}
