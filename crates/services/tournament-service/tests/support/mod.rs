//! Shared helpers for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use common::DatabaseConfig;
use domain::NewTournament;
use tournament_service_lib::infra::{Database, UnitOfWork};

/// Fresh, migrated in-memory store.
///
/// A single pooled connection keeps the in-memory database alive and shared.
pub async fn test_database() -> Database {
    Database::connect(&DatabaseConfig::single_connection("sqlite::memory:"))
        .await
        .expect("in-memory database should connect and migrate")
}

/// Noon on the given day of June 2024
pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
}

/// Commit `count` tournaments titled "Tournament 01", "Tournament 02", ...
pub async fn insert_tournaments(db: &Database, count: u32) {
    let uow = db.session();
    for i in 1..=count {
        uow.tournaments()
            .add(NewTournament::new(format!("Tournament {:02}", i), day(1 + i % 28)))
            .await
            .unwrap();
    }
    uow.commit().await.unwrap();
}
