//! Runs checks over entities
//!
//! Reports come out entity-major, check-minor: every check for the first
//! entity, then every check for the second, and so on. Observers see each
//! report before it is appended to the result.

use schemasmell_core::Report;
use tracing::debug;

use crate::check::{Check, CheckError};
use crate::entity::Entity;

/// Receives reports as they are produced
pub trait Observer {
    fn notify(&mut self, report: &Report);
}

impl<F> Observer for F
where
    F: FnMut(&Report),
{
    fn notify(&mut self, report: &Report) {
        self(report)
    }
}

/// Ordered checks, entities and observers
#[derive(Default)]
pub struct Orchestrator<'a> {
    checks: Vec<Box<dyn Check + 'a>>,
    entities: Vec<Entity<'a>>,
    observers: Vec<Box<dyn Observer + 'a>>,
}

impl<'a> Orchestrator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_checks(&mut self, checks: impl IntoIterator<Item = Box<dyn Check + 'a>>) -> &mut Self {
        self.checks.extend(checks);
        self
    }

    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = Entity<'a>>) -> &mut Self {
        self.entities.extend(entities);
        self
    }

    pub fn add_callbacks(
        &mut self,
        observers: impl IntoIterator<Item = Box<dyn Observer + 'a>>,
    ) -> &mut Self {
        self.observers.extend(observers);
        self
    }

    pub fn add_callback(&mut self, observer: impl Observer + 'a) -> &mut Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Remove checks by name
    pub fn disable_checks<S: AsRef<str>>(&mut self, names: &[S]) -> &mut Self {
        self.checks.retain(|check| {
            let disabled = names.iter().any(|name| name.as_ref() == check.name());
            if disabled {
                debug!(check = check.name(), "check disabled");
            }
            !disabled
        });
        self
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    /// Run every supported check on every entity
    ///
    /// The first check error aborts the run; reports already delivered to
    /// observers stay delivered.
    pub fn run(&mut self) -> Result<Vec<Report>, CheckError> {
        let mut reports = Vec::new();

        for entity in &self.entities {
            for check in &self.checks {
                if !check.supports(entity) {
                    continue;
                }

                let Some(report) = check.run(entity)? else {
                    continue;
                };

                debug!(
                    check = report.check(),
                    entity = %report.entity(),
                    status = %report.status(),
                    "report"
                );
                for observer in &mut self.observers {
                    observer.notify(&report);
                }
                reports.push(report);
            }
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemasmell_core::{Account, Database, Status};
    use std::cell::{Cell, RefCell};

    /// Check double counting calls
    struct Instrumented<'c> {
        name: &'static str,
        supports: bool,
        emits: bool,
        runs: &'c Cell<usize>,
    }

    impl Check for Instrumented<'_> {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports(&self, _entity: &Entity<'_>) -> bool {
            self.supports
        }

        fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
            self.runs.set(self.runs.get() + 1);
            Ok(self
                .emits
                .then(|| self.report(entity, Status::Info, vec![])))
        }
    }

    struct Failing;

    impl Check for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn supports(&self, entity: &Entity<'_>) -> bool {
            matches!(entity, Entity::Account(_))
        }

        fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
            Err(self.unavailable(entity, "everything"))
        }
    }

    fn accounts() -> Vec<Account> {
        vec![Account::new("a", "%"), Account::new("b", "%")]
    }

    #[test]
    fn unsupported_checks_never_run() {
        let accounts = accounts();
        let skipped = Cell::new(0);
        let silent = Cell::new(0);
        let emitting = Cell::new(0);

        let mut orchestrator = Orchestrator::new();
        orchestrator
            .add_checks([
                Box::new(Instrumented { name: "skipped", supports: false, emits: true, runs: &skipped })
                    as Box<dyn Check + '_>,
                Box::new(Instrumented { name: "silent", supports: true, emits: false, runs: &silent }),
                Box::new(Instrumented { name: "emitting", supports: true, emits: true, runs: &emitting }),
            ])
            .add_entities(accounts.iter().map(Entity::Account));

        let reports = orchestrator.run().unwrap();

        assert_eq!(skipped.get(), 0);
        assert_eq!(silent.get(), 2);
        assert_eq!(emitting.get(), 2);
        assert_eq!(reports.len(), 2);
        assert!(reports.len() <= accounts.len() * 3);
    }

    #[test]
    fn reports_are_entity_major() {
        let accounts = accounts();
        let first = Cell::new(0);
        let second = Cell::new(0);

        let mut orchestrator = Orchestrator::new();
        orchestrator
            .add_checks([
                Box::new(Instrumented { name: "first", supports: true, emits: true, runs: &first })
                    as Box<dyn Check + '_>,
                Box::new(Instrumented { name: "second", supports: true, emits: true, runs: &second }),
            ])
            .add_entities(accounts.iter().map(Entity::Account));

        let order: Vec<String> = orchestrator
            .run()
            .unwrap()
            .iter()
            .map(|r| format!("{}/{}", r.entity().name, r.check()))
            .collect();

        assert_eq!(order, vec!["a@%/first", "a@%/second", "b@%/first", "b@%/second"]);
    }

    #[test]
    fn observers_see_every_report() {
        let database = Database::new("db1");
        let runs = Cell::new(0);
        let seen = RefCell::new(Vec::new());
        let count = Cell::new(0);

        {
            let mut orchestrator = Orchestrator::new();
            orchestrator
                .add_checks([Box::new(Instrumented {
                    name: "emitting",
                    supports: true,
                    emits: true,
                    runs: &runs,
                }) as Box<dyn Check + '_>])
                .add_entities([Entity::Database(&database)])
                .add_callback(|report: &Report| seen.borrow_mut().push(report.check().to_string()))
                .add_callbacks([Box::new(|_: &Report| count.set(count.get() + 1)) as Box<dyn Observer + '_>]);

            let reports = orchestrator.run().unwrap();
            assert_eq!(reports.len(), 1);
        }

        assert_eq!(seen.into_inner(), vec!["emitting".to_string()]);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn check_error_aborts_the_run() {
        let accounts = accounts();
        let runs = Cell::new(0);

        let mut orchestrator = Orchestrator::new();
        orchestrator
            .add_checks([
                Box::new(Instrumented { name: "emitting", supports: true, emits: true, runs: &runs })
                    as Box<dyn Check + '_>,
                Box::new(Failing),
            ])
            .add_entities(accounts.iter().map(Entity::Account));

        let err = orchestrator.run().unwrap_err();
        assert_eq!(
            err,
            CheckError::DataUnavailable {
                check: "failing".into(),
                entity: "a@%".into(),
                fact: "everything".into()
            }
        );
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn disabled_checks_are_removed() {
        let runs = Cell::new(0);
        let mut orchestrator = Orchestrator::new();
        orchestrator
            .add_checks([
                Box::new(Instrumented { name: "keep", supports: true, emits: true, runs: &runs })
                    as Box<dyn Check + '_>,
                Box::new(Failing),
            ])
            .disable_checks(&["failing"]);

        assert_eq!(orchestrator.check_names(), vec!["keep"]);
    }
}
