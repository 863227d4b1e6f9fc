//! schemasmell engine
//!
//! This crate implements the checking side of schemasmell:
//! - The [`Check`] trait and the built-in check library
//! - Entity enumeration over a catalog
//! - The [`Orchestrator`] running checks and notifying observers

pub mod check;
pub mod checks;
pub mod entity;
pub mod orchestrator;

pub use check::{Check, CheckError};
pub use entity::{entities, Entity};
pub use orchestrator::{Observer, Orchestrator};

use schemasmell_core::{Database, Report};

/// Run every enabled built-in check over the whole catalog
pub fn check_database(database: &Database, disabled: &[String]) -> Result<Vec<Report>, CheckError> {
    let mut orchestrator = Orchestrator::new();
    orchestrator
        .add_checks(checks::all())
        .disable_checks(disabled)
        .add_entities(entities(database));
    orchestrator.run()
}
