//! Database (server) entity, the root of the catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::account::Account;
use super::query::Query;
use super::schema::Schema;

/// `major.minor.patch` parsed from `@@version`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MysqlVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl MysqlVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse strings like `8.0.35`, `5.7.44-log` or `8.4`
    pub fn parse(version: &str) -> Option<Self> {
        let numeric: String = version
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let mut parts = numeric.split('.').filter(|p| !p.is_empty());
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

        Some(Self { major, minor, patch })
    }
}

impl std::fmt::Display for MysqlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A server: session variables, accounts, schemas and query digests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// Label of the source (host:port, script path)
    #[serde(default)]
    pub name: String,

    /// Session variables, lower-case names
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    #[serde(default)]
    accounts: BTreeMap<String, Account>,

    #[serde(default)]
    schemas: Vec<Schema>,

    #[serde(default)]
    queries: Vec<Query>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Schemas in creation order
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub fn schema_mut(&mut self, name: &str) -> Option<&mut Schema> {
        self.schemas.iter_mut().find(|s| s.name == name)
    }

    pub fn schemas_mut(&mut self) -> impl Iterator<Item = &mut Schema> {
        self.schemas.iter_mut()
    }

    /// Existing schema, or a new empty one appended at the end
    pub fn get_or_create_schema(&mut self, name: &str) -> &mut Schema {
        let position = match self.schemas.iter().position(|s| s.name == name) {
            Some(position) => position,
            None => {
                self.schemas.push(Schema::new(name));
                self.schemas.len() - 1
            }
        };
        &mut self.schemas[position]
    }

    pub fn remove_schema(&mut self, name: &str) -> Option<Schema> {
        let position = self.schemas.iter().position(|s| s.name == name)?;
        Some(self.schemas.remove(position))
    }

    pub fn retain_schemas(&mut self, keep: impl FnMut(&Schema) -> bool) {
        self.schemas.retain(keep);
    }

    /// Accounts ordered by `user@host`
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn account(&self, user: &str, host: &str) -> Option<&Account> {
        self.accounts.get(&Account::key_for(user, host))
    }

    pub fn account_mut(&mut self, user: &str, host: &str) -> Option<&mut Account> {
        self.accounts.get_mut(&Account::key_for(user, host))
    }

    /// Insert or replace an account
    pub fn add_account(&mut self, mut account: Account) {
        account.database_name = self.name.clone();
        self.accounts.insert(account.key(), account);
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn queries_mut(&mut self) -> impl Iterator<Item = &mut Query> {
        self.queries.iter_mut()
    }

    pub fn add_query(&mut self, query: Query) {
        self.queries.push(query);
    }

    /// Session variable by case-insensitive name
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn set_variable(&mut self, name: &str, value: impl Into<String>) {
        self.variables.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Server version from the `version` variable
    pub fn version(&self) -> Option<MysqlVersion> {
        self.variable("version").and_then(MysqlVersion::parse)
    }

    /// Restore owner names throughout the tree
    pub fn relink(&mut self) {
        for schema in &mut self.schemas {
            schema.relink();
        }
        for account in self.accounts.values_mut() {
            account.database_name = self.name.clone();
        }
    }
}
