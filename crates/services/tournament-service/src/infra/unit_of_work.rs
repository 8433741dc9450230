//! Unit of Work pattern implementation.
//!
//! DDD: Coordinates operations across multiple aggregates atomically.
//!
//! A unit of work is one session per logical operation:
//! - Owns one repository per entity type, all staging into one change buffer
//! - Commits the whole buffer in a single database transaction
//! - Leaves the store untouched when any staged change fails
//!
//! Sessions are created per operation and never shared between concurrent
//! operations. See `ServiceScope` for the per-operation composition root.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use crate::repository::changes::{ChangeSet, PendingChange, Resolution};
use crate::repository::{
    apply_game_change, apply_tournament_change, GameRepository, GameStore, TournamentRepository,
    TournamentStore,
};
use common::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides the session's repositories and commits what they staged.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get tournament repository
    fn tournaments(&self) -> Arc<dyn TournamentRepository>;

    /// Get game repository
    fn games(&self) -> Arc<dyn GameRepository>;

    /// Number of changes staged since the last commit
    fn pending_changes(&self) -> usize;

    /// Drop every staged change without touching the store.
    ///
    /// Returns how many changes were discarded.
    fn discard(&self) -> usize;

    /// Persist all staged changes atomically.
    ///
    /// Returns the number of affected records. On failure nothing is
    /// persisted, the staged changes are dropped and the caller should retry
    /// the whole logical operation.
    async fn commit(&self) -> AppResult<u64>;
}

/// Concrete implementation of UnitOfWork backed by SeaORM
pub struct Persistence {
    db: DatabaseConnection,
    changes: ChangeSet,
    tournament_repo: Arc<TournamentStore>,
    game_repo: Arc<GameStore>,
}

impl Persistence {
    /// Start a new session against the given connection
    pub fn new(db: DatabaseConnection) -> Self {
        let changes = ChangeSet::new();
        let tournament_repo = Arc::new(TournamentStore::new(db.clone(), changes.clone()));
        let game_repo = Arc::new(GameStore::new(db.clone(), changes.clone()));

        Self {
            db,
            changes,
            tournament_repo,
            game_repo,
        }
    }

    async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        match self.db.get_database_backend() {
            // SQLite has no per-transaction isolation settings
            DbBackend::Sqlite => self.db.begin().await,
            _ => {
                self.db
                    .begin_with_config(
                        Some(IsolationLevel::ReadCommitted),
                        Some(AccessMode::ReadWrite),
                    )
                    .await
            }
        }
    }

    /// Apply staged changes in order, collecting handles to resolve after commit.
    async fn apply(
        txn: &DatabaseTransaction,
        pending: Vec<PendingChange>,
    ) -> Result<(u64, Vec<Resolution>), DbErr> {
        let mut affected = 0;
        let mut resolutions = Vec::new();

        for change in pending {
            let applied = match change {
                PendingChange::Tournament(change) => apply_tournament_change(txn, change).await?,
                PendingChange::Game(change) => apply_game_change(txn, change).await?,
            };
            affected += applied.affected;
            resolutions.extend(applied.resolution);
        }

        Ok((affected, resolutions))
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn tournaments(&self) -> Arc<dyn TournamentRepository> {
        self.tournament_repo.clone()
    }

    fn games(&self) -> Arc<dyn GameRepository> {
        self.game_repo.clone()
    }

    fn pending_changes(&self) -> usize {
        self.changes.len()
    }

    fn discard(&self) -> usize {
        let discarded = self.changes.take().len();
        if discarded > 0 {
            tracing::debug!(discarded, "Discarded staged changes");
        }
        discarded
    }

    async fn commit(&self) -> AppResult<u64> {
        let pending = self.changes.take();
        if pending.is_empty() {
            return Ok(0);
        }
        let staged = pending.len();

        // Dropping this future mid-way drops the transaction, which rolls back
        let txn = self.begin().await?;

        match Self::apply(&txn, pending).await {
            Ok((affected, resolutions)) => {
                txn.commit().await?;
                resolutions.into_iter().for_each(Resolution::finish);
                tracing::debug!(staged, affected, "Unit of work committed");
                Ok(affected)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                tracing::warn!(staged, "Unit of work commit failed: {}", e);
                Err(AppError::from(e))
            }
        }
    }
}
