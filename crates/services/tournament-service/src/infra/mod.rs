//! Infrastructure layer - database, unit of work and seeding.

mod db;
pub mod migrations;
pub mod seed;
pub mod unit_of_work;

pub use db::{Database, MigrationState};
pub use migrations::Migrator;
pub use seed::{ensure_seeded, SeedOutcome};
pub use unit_of_work::{Persistence, UnitOfWork};
