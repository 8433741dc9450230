//! Seeder, bootstrap and migration command integration tests.

mod support;

use tokio_test::{assert_err, assert_ok};

use common::{AppError, DatabaseConfig, Pagination};
use domain::{GameFilter, NewTournament, TournamentFilter};
use tournament_service_lib::config::{AppEnvironment, TournamentServiceConfig};
use tournament_service_lib::MigrateAction;
use tournament_service_lib::infra::seed::{baseline_tournaments, SEED_MARKER_TITLE};
use tournament_service_lib::infra::{ensure_seeded, Database, SeedOutcome, UnitOfWork};

use support::{day, test_database};

async fn row_counts(db: &Database) -> (u64, u64) {
    let uow = db.session();
    let tournaments = assert_ok!(uow.tournaments().count(TournamentFilter::default()).await);
    let games = assert_ok!(uow.games().count(GameFilter::default()).await);
    (tournaments, games)
}

fn baseline_records() -> u64 {
    baseline_tournaments()
        .unwrap()
        .iter()
        .map(|t| 1 + t.games.len() as u64)
        .sum()
}

#[tokio::test]
async fn test_seed_inserts_baseline_once() {
    let db = test_database().await;

    let first = assert_ok!(ensure_seeded(&db.session()).await);
    assert_eq!(first, SeedOutcome::Seeded { records: baseline_records() });
    let after_first = row_counts(&db).await;

    let second = assert_ok!(ensure_seeded(&db.session()).await);
    assert_eq!(second, SeedOutcome::AlreadySeeded);
    assert_eq!(row_counts(&db).await, after_first);

    let uow = db.session();
    assert!(assert_ok!(uow.tournaments().exists_by_title(SEED_MARKER_TITLE).await));
}

#[tokio::test]
async fn test_seed_counts_match_baseline() {
    let db = test_database().await;
    assert_ok!(ensure_seeded(&db.session()).await);

    let baseline = baseline_tournaments().unwrap();
    let games: usize = baseline.iter().map(|t| t.games.len()).sum();

    assert_eq!(row_counts(&db).await, (baseline.len() as u64, games as u64));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_seeders_insert_once() {
    let db = test_database().await;
    let first = db.session();
    let second = db.session();

    let (a, b) = tokio::join!(ensure_seeded(&first), ensure_seeded(&second));
    let outcomes = [assert_ok!(a), assert_ok!(b)];

    let seeded = outcomes
        .iter()
        .filter(|o| matches!(o, SeedOutcome::Seeded { .. }))
        .count();
    assert_eq!(seeded, 1);
    assert!(outcomes.contains(&SeedOutcome::AlreadySeeded));

    let baseline = baseline_tournaments().unwrap();
    assert_eq!(row_counts(&db).await.0, baseline.len() as u64);
    assert_eq!(first.pending_changes() + second.pending_changes(), 0);
}

#[tokio::test]
async fn test_seed_title_collision_is_an_error() {
    let db = test_database().await;
    let existing = db.session();
    assert_ok!(
        existing
            .tournaments()
            .add(NewTournament::new("Summer Masters 2024", day(1)))
            .await
    );
    assert_ok!(existing.commit().await);

    for _ in 0..2 {
        let uow = db.session();
        let err = assert_err!(ensure_seeded(&uow).await);
        assert!(err.is_unique_violation());
        assert_eq!(uow.pending_changes(), 0);
    }

    let uow = db.session();
    assert!(!assert_ok!(uow.tournaments().exists_by_title(SEED_MARKER_TITLE).await));
    assert_eq!(row_counts(&db).await, (1, 0));
}

#[tokio::test]
async fn test_seed_requires_clean_session() {
    let db = test_database().await;
    let uow = db.session();
    assert_ok!(uow.tournaments().add(NewTournament::new("Spring Cup", day(1))).await);

    let err = assert_err!(ensure_seeded(&uow).await);
    assert!(matches!(err, AppError::Internal(_)));
    assert_eq!(uow.pending_changes(), 1);

    assert_eq!(assert_ok!(uow.commit().await), 1);
    assert!(!assert_ok!(uow.tournaments().exists_by_title(SEED_MARKER_TITLE).await));
}

#[tokio::test]
async fn test_bootstrap_seeds_when_enabled() {
    let config = TournamentServiceConfig {
        database: DatabaseConfig::single_connection("sqlite::memory:"),
        ..TournamentServiceConfig::default()
    };

    let db = assert_ok!(tournament_service_lib::bootstrap(&config).await);
    assert_ok!(db.ping().await);

    let page = assert_ok!(
        tournament_service_lib::list_tournaments(
            &db,
            TournamentFilter::default(),
            Pagination::page(1, 2)
        )
        .await
    );
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].title, SEED_MARKER_TITLE);
    assert_eq!(page.meta.total, baseline_tournaments().unwrap().len() as u64);
}

#[tokio::test]
async fn test_bootstrap_skips_seed_when_disabled() {
    let config = TournamentServiceConfig {
        database: DatabaseConfig::single_connection("sqlite::memory:"),
        seed_on_startup: false,
        ..TournamentServiceConfig::default()
    };

    let db = assert_ok!(tournament_service_lib::bootstrap(&config).await);

    assert_eq!(row_counts(&db).await, (0, 0));
    let status = assert_ok!(db.migration_status().await);
    assert!(status.iter().all(|migration| migration.applied));
}

#[tokio::test]
async fn test_fresh_migration_refused_in_production() {
    let config = TournamentServiceConfig {
        database: DatabaseConfig::single_connection("sqlite::memory:"),
        environment: AppEnvironment::Production,
        seed_on_startup: false,
    };

    let result = tournament_service_lib::migrate(&config, MigrateAction::Fresh).await;
    assert!(result.is_err());

    let development = TournamentServiceConfig {
        environment: AppEnvironment::Development,
        ..config
    };
    assert!(tournament_service_lib::migrate(&development, MigrateAction::Fresh).await.is_ok());
}
