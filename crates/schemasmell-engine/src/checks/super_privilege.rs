//! Accounts holding SUPER

use schemasmell_core::{Account, Report, Status};

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// Reserved local accounts that legitimately hold SUPER
const RESERVED_ACCOUNTS: &[(&str, &str)] = &[
    ("root", "localhost"),
    ("mysql.session", "localhost"),
    ("mysql.sys", "localhost"),
    ("mysql.infoschema", "localhost"),
];

fn is_reserved(account: &Account) -> bool {
    RESERVED_ACCOUNTS
        .iter()
        .any(|(user, host)| account.user == *user && account.host.eq_ignore_ascii_case(host))
}

pub struct SuperPrivilege;

impl Check for SuperPrivilege {
    fn name(&self) -> &'static str {
        "super_privilege"
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        entity
            .as_account()
            .is_some_and(|account| account.has_privilege("SUPER"))
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Some(account) = entity.as_account() else {
            return Ok(None);
        };

        let report = if is_reserved(account) {
            self.report(entity, Status::Ok, vec![])
        } else {
            self.report(
                entity,
                Status::Concern,
                vec![format!(
                    "Account {} has the SUPER privilege",
                    account.key()
                )],
            )
        };

        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::status;

    fn with_privilege(user: &str, host: &str, privilege: &str) -> Account {
        let mut account = Account::new(user, host);
        account.grant(privilege);
        account
    }

    #[test]
    fn application_account_with_super() {
        let account = with_privilege("app", "%", "SUPER");
        assert_eq!(status(&SuperPrivilege, &Entity::Account(&account)), Some(Status::Concern));

        let account = with_privilege("app", "%", "ALL");
        assert_eq!(status(&SuperPrivilege, &Entity::Account(&account)), Some(Status::Concern));
    }

    #[test]
    fn reserved_accounts_are_ok() {
        let account = with_privilege("root", "localhost", "SUPER");
        assert_eq!(status(&SuperPrivilege, &Entity::Account(&account)), Some(Status::Ok));
    }

    #[test]
    fn accounts_without_super_are_skipped() {
        let account = with_privilege("app", "%", "SELECT");
        assert_eq!(status(&SuperPrivilege, &Entity::Account(&account)), None);
    }
}
