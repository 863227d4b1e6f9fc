//! Table reference resolution for query digests
//!
//! Walks a parsed statement and maps every alias (or bare table name) in
//! FROM / JOIN clauses to the table it stands for. CTE names are local to
//! the query and never resolve to a table.

use schemasmell_core::TableReference;
use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use std::collections::{BTreeMap, HashSet};

/// Alias to table resolver
#[derive(Debug, Default)]
pub struct TableResolver {
    ctes: HashSet<String>,
    tables: BTreeMap<String, TableReference>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect table references from a statement
    pub fn resolve(&mut self, statement: &Statement) {
        match statement {
            Statement::Query(query) => self.resolve_query(query),
            Statement::Update { table, .. } => self.resolve_table_with_joins(table),
            _ => {}
        }
    }

    fn resolve_query(&mut self, query: &Query) {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.ctes.insert(cte.alias.name.value.to_ascii_lowercase());
                self.resolve_query(&cte.query);
            }
        }

        self.resolve_set_expr(&query.body);
    }

    fn resolve_set_expr(&mut self, set_expr: &SetExpr) {
        match set_expr {
            SetExpr::Select(select) => self.resolve_select(select),
            SetExpr::Query(query) => self.resolve_query(query),
            SetExpr::SetOperation { left, right, .. } => {
                self.resolve_set_expr(left);
                self.resolve_set_expr(right);
            }
            _ => {}
        }
    }

    fn resolve_select(&mut self, select: &Select) {
        for table_with_joins in &select.from {
            self.resolve_table_with_joins(table_with_joins);
        }
    }

    fn resolve_table_with_joins(&mut self, table_with_joins: &TableWithJoins) {
        self.resolve_table_factor(&table_with_joins.relation);
        for join in &table_with_joins.joins {
            self.resolve_table_factor(&join.relation);
        }
    }

    fn resolve_table_factor(&mut self, table_factor: &TableFactor) {
        match table_factor {
            TableFactor::Table { name, alias, .. } => {
                let parts: Vec<String> = name
                    .to_string()
                    .split('.')
                    .map(|part| part.trim_matches('`').trim_matches('"').to_string())
                    .collect();

                let reference = match parts.as_slice() {
                    [table] => TableReference {
                        schema: None,
                        table: table.clone(),
                    },
                    [.., schema, table] => TableReference {
                        schema: Some(schema.clone()),
                        table: table.clone(),
                    },
                    [] => return,
                };

                if reference.schema.is_none()
                    && self.ctes.contains(&reference.table.to_ascii_lowercase())
                {
                    return;
                }

                let key = alias
                    .as_ref()
                    .map(|a| a.name.value.clone())
                    .unwrap_or_else(|| reference.table.clone());

                self.tables.insert(key, reference);
            }
            TableFactor::Derived { subquery, .. } => self.resolve_query(subquery),
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.resolve_table_with_joins(table_with_joins),
            _ => {}
        }
    }

    pub fn is_cte(&self, name: &str) -> bool {
        self.ctes.contains(&name.to_ascii_lowercase())
    }

    pub fn tables(&self) -> &BTreeMap<String, TableReference> {
        &self.tables
    }

    pub fn into_tables(self) -> BTreeMap<String, TableReference> {
        self.tables
    }
}
