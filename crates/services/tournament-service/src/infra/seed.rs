//! Baseline data seeding.
//!
//! Seeding is idempotent by inspection: the store is considered seeded when
//! the marker tournament exists. A concurrent seeder that loses the race hits
//! the unique title index at commit time; once the marker is visible that is
//! reported as `AlreadySeeded` instead of an error.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::unit_of_work::UnitOfWork;
use common::{AppError, AppResult};
use domain::NewTournament;

/// Title of the tournament whose presence marks the store as seeded
pub const SEED_MARKER_TITLE: &str = "Spring Open 2024";

/// Baseline tournaments: title and start date (year, month, day)
const BASELINE_TOURNAMENTS: &[(&str, i32, u32, u32)] = &[
    (SEED_MARKER_TITLE, 2024, 3, 2),
    ("Summer Masters 2024", 2024, 6, 15),
    ("Autumn Invitational 2024", 2024, 9, 7),
    ("Winter Classic 2024", 2024, 12, 7),
    ("New Year Cup 2025", 2025, 1, 4),
];

/// Games played in every baseline tournament, one per day from the start
const BASELINE_GAMES: &[&str] = &["Group Stage A", "Group Stage B", "Semi Final", "Final"];

/// Hour of day (UTC) baseline tournaments and games start at
const BASELINE_START_HOUR: u32 = 10;

/// Result of a seeding attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Baseline data was inserted; `records` rows were written
    Seeded { records: u64 },
    /// Baseline data was already present, nothing was written
    AlreadySeeded,
}

/// Deterministic baseline data set.
pub fn baseline_tournaments() -> AppResult<Vec<NewTournament>> {
    BASELINE_TOURNAMENTS
        .iter()
        .map(|&(title, year, month, day)| {
            let start = start_of(year, month, day).ok_or_else(|| {
                AppError::internal(format!("Invalid baseline date for '{}'", title))
            })?;

            let tournament = BASELINE_GAMES
                .iter()
                .zip(0i64..)
                .fold(NewTournament::new(title, start), |tournament, (game, day)| {
                    tournament.with_game(*game, start + Duration::days(day))
                });
            Ok(tournament)
        })
        .collect()
}

fn start_of(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(BASELINE_START_HOUR, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Insert the baseline data set unless the store already holds it.
///
/// Safe to call on every start and from several instances at once. The
/// session must not hold staged changes of its own.
pub async fn ensure_seeded(uow: &dyn UnitOfWork) -> AppResult<SeedOutcome> {
    let pending = uow.pending_changes();
    if pending > 0 {
        return Err(AppError::internal(format!(
            "Cannot seed a session holding {} staged changes",
            pending
        )));
    }

    let tournaments = uow.tournaments();

    if tournaments.exists_by_title(SEED_MARKER_TITLE).await? {
        tracing::debug!("Baseline data already present, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    for tournament in baseline_tournaments()? {
        if let Err(e) = tournaments.add(tournament).await {
            uow.discard();
            return Err(e);
        }
    }

    match uow.commit().await {
        Ok(records) => {
            tracing::info!(records, "Seeded baseline data");
            Ok(SeedOutcome::Seeded { records })
        }
        Err(e) if e.is_unique_violation() => {
            // Only a committed marker means another seeder won the race
            if tournaments.exists_by_title(SEED_MARKER_TITLE).await? {
                tracing::info!("Baseline data was inserted concurrently, skipping seed");
                Ok(SeedOutcome::AlreadySeeded)
            } else {
                tracing::error!("Baseline title collides with existing data: {}", e);
                Err(e)
            }
        }
        Err(e) => Err(e),
    }
}
