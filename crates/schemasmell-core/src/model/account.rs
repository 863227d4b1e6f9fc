//! Account entity

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const ALL_PRIVILEGES: &str = "ALL PRIVILEGES";

/// A `user@host` account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user: String,
    pub host: String,

    /// Owning database (lookup key)
    #[serde(default)]
    pub database_name: String,

    /// Global privileges, upper-cased (`SUPER`, `ALL PRIVILEGES`, ...)
    #[serde(default)]
    pub privileges: BTreeSet<String>,

    #[serde(default)]
    pub has_password: bool,

    #[serde(default)]
    pub plugin: Option<String>,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub password_expired: bool,

    #[serde(default)]
    pub max_connections: u64,

    #[serde(default)]
    pub current_connections: u64,

    #[serde(default)]
    pub total_connections: u64,
}

impl Account {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
            database_name: String::new(),
            privileges: BTreeSet::new(),
            has_password: false,
            plugin: None,
            locked: false,
            password_expired: false,
            max_connections: 0,
            current_connections: 0,
            total_connections: 0,
        }
    }

    /// Map key, `user@host`
    pub fn key(&self) -> String {
        Self::key_for(&self.user, &self.host)
    }

    pub fn key_for(user: &str, host: &str) -> String {
        format!("{}@{}", user, host)
    }

    pub fn grant(&mut self, privilege: &str) {
        let privilege = privilege.trim().to_ascii_uppercase();
        let privilege = if privilege == "ALL" {
            ALL_PRIVILEGES.to_string()
        } else {
            privilege
        };
        self.privileges.insert(privilege);
    }

    /// Whether the privilege is held directly or through `ALL PRIVILEGES`
    pub fn has_privilege(&self, privilege: &str) -> bool {
        self.privileges.contains(ALL_PRIVILEGES)
            || self.privileges.contains(&privilege.trim().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format() {
        assert_eq!(Account::new("app", "%").key(), "app@%");
    }

    #[test]
    fn all_implies_everything() {
        let mut account = Account::new("root", "localhost");
        assert!(!account.has_privilege("super"));
        account.grant("all");
        assert!(account.has_privilege("SUPER"));
        assert!(account.privileges.contains("ALL PRIVILEGES"));
    }
}
