//! Accounts that can log in without a password

use schemasmell_core::{Account, Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Plugins authenticating through the operating system
const SOCKET_PLUGINS: &[&str] = &["auth_socket", "unix_socket"];

/// WARNING for local passwordless accounts, CRITICAL for remote ones
pub struct PasswordlessAccount;

fn authenticates_otherwise(account: &Account) -> bool {
    account.locked
        || account
            .plugin
            .as_deref()
            .is_some_and(|plugin| SOCKET_PLUGINS.iter().any(|p| plugin.eq_ignore_ascii_case(p)))
}

impl Check for PasswordlessAccount {
    fn name(&self) -> &'static str {
        "passwordless_account"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity.as_account().is_some()
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(account) = entity.as_account() else {
            return Ok(None);
        };

        if account.has_password || authenticates_otherwise(account) {
            return Ok(Some(self.report(entity, Status::Ok, vec![])));
        }

        let local = LOCAL_HOSTS
            .iter()
            .any(|host| account.host.eq_ignore_ascii_case(host));
        let (status, reach) = if local {
            (Status::Warning, "locally")
        } else {
            (Status::Critical, "remotely")
        };

        Ok(Some(self.report(
            entity,
            status,
            vec![format!(
                "Account {} has no password and can connect {}",
                account.key(),
                reach
            )],
        )))
    }
}
