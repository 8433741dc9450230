//! Tournament Service Library
//!
//! Data-access core for tournaments and their games: repositories, a
//! buffering unit of work, lazily constructed services and an idempotent
//! baseline seeder. Hosts (an HTTP layer, the bundled CLI) open one
//! `ServiceScope` per logical operation.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use tracing::info;

use common::{AppResult, Paginated, Pagination};
use domain::{Tournament, TournamentFilter};

use crate::config::TournamentServiceConfig;
use crate::infra::{ensure_seeded, Database, SeedOutcome};
use crate::service::{ServiceManager, ServiceScope};

/// Process-start hook: connect, apply migrations and seed if configured.
pub async fn bootstrap(config: &TournamentServiceConfig) -> AppResult<Database> {
    let db = Database::connect(&config.database).await?;

    if config.seed_on_startup {
        match ensure_seeded(&db.session()).await? {
            SeedOutcome::Seeded { records } => info!(records, "Baseline data seeded"),
            SeedOutcome::AlreadySeeded => info!("Baseline data already present"),
        }
    } else {
        info!(environment = ?config.environment, "Seeding on startup disabled");
    }

    Ok(db)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    migrate(&TournamentServiceConfig::from_env(), action).await
}

/// Apply a migration action to the configured store.
///
/// `Fresh` wipes every tournament and is refused in production.
pub async fn migrate(
    config: &TournamentServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(action, MigrateAction::Fresh) && config.environment.is_production() {
        return Err("Refusing to wipe the tournament store in production".into());
    }

    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => db.run_migrations().await?,
        MigrateAction::Down => db.rollback_migration().await?,
        MigrateAction::Status => {
            for migration in db.migration_status().await? {
                println!("{}", migration);
            }
        }
        MigrateAction::Fresh => db.fresh_migrations().await?,
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Seed baseline data regardless of the startup policy (for CLI commands).
pub async fn run_seed() -> AppResult<SeedOutcome> {
    let config = TournamentServiceConfig::from_env();
    let db = Database::connect(&config.database).await?;

    ensure_seeded(&db.session()).await
}

/// List one page of tournaments through a fresh service scope.
pub async fn list_tournaments(
    db: &Database,
    filter: TournamentFilter,
    pagination: Pagination,
) -> AppResult<Paginated<Tournament>> {
    let scope = ServiceScope::begin(db.connection());
    let tournaments = scope.tournaments()?;
    tournaments.get_all(filter, pagination).await
}
