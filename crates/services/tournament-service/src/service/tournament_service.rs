//! Tournament service - Handles tournament use cases.
//!
//! SOLID (SRP): Handles tournament-related use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use futures::TryStreamExt;
use std::sync::Arc;

use common::{AppError, AppResult, Paginated, Pagination};
use domain::{NewTournament, Tournament, TournamentFilter, TournamentId, UpdateTournament};

use crate::infra::UnitOfWork;

/// Tournament service trait for dependency injection.
///
/// Mutating operations commit the session before returning.
#[async_trait]
pub trait TournamentService: Send + Sync {
    /// List tournaments page by page with the total match count
    async fn get_all(
        &self,
        filter: TournamentFilter,
        pagination: Pagination,
    ) -> AppResult<Paginated<Tournament>>;

    /// Get tournament by ID, optionally with its games
    async fn get_by_id(&self, id: TournamentId, include_games: bool) -> AppResult<Tournament>;

    async fn exists(&self, id: TournamentId) -> AppResult<bool>;

    /// Create a tournament and its initial games (title must be unique)
    async fn create(&self, tournament: NewTournament) -> AppResult<Tournament>;

    /// Update title and/or start date
    async fn update(&self, id: TournamentId, changes: UpdateTournament) -> AppResult<Tournament>;

    /// Delete a tournament together with its games, returning removed rows
    async fn delete(&self, id: TournamentId) -> AppResult<u64>;
}

/// Concrete implementation of TournamentService using Unit of Work.
pub struct TournamentManager {
    uow: Arc<dyn UnitOfWork>,
}

impl TournamentManager {
    /// Create new tournament service instance with Unit of Work
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Commit, reporting a lost race on the unique title as a conflict
    async fn commit(&self) -> AppResult<u64> {
        self.uow.commit().await.map_err(|e| {
            if e.is_unique_violation() {
                AppError::conflict("Tournament title")
            } else {
                e
            }
        })
    }

    async fn ensure_title_free(&self, title: &str) -> AppResult<()> {
        if self.uow.tournaments().exists_by_title(title).await? {
            return Err(AppError::conflict("Tournament title"));
        }
        Ok(())
    }
}

#[async_trait]
impl TournamentService for TournamentManager {
    async fn get_all(
        &self,
        filter: TournamentFilter,
        pagination: Pagination,
    ) -> AppResult<Paginated<Tournament>> {
        let repo = self.uow.tournaments();

        let (total, data) = futures::try_join!(
            repo.count(filter.clone()),
            repo.get_all(filter, pagination).try_collect::<Vec<_>>(),
        )?;

        Ok(Paginated::new(data, pagination, total))
    }

    async fn get_by_id(&self, id: TournamentId, include_games: bool) -> AppResult<Tournament> {
        self.uow.tournaments().get_by_id(id, include_games).await
    }

    async fn exists(&self, id: TournamentId) -> AppResult<bool> {
        self.uow.tournaments().exists(id).await
    }

    async fn create(&self, tournament: NewTournament) -> AppResult<Tournament> {
        tournament.ensure_valid()?;
        self.ensure_title_free(&tournament.title).await?;

        let staged = self.uow.tournaments().add(tournament).await?;
        self.commit().await?;

        let created = staged.persisted()?;
        tracing::info!(tournament_id = created.id, "Tournament created");
        Ok(created)
    }

    async fn update(&self, id: TournamentId, changes: UpdateTournament) -> AppResult<Tournament> {
        let repo = self.uow.tournaments();
        let mut tournament = repo.get_by_id(id, false).await?;

        if let Some(title) = changes.title.as_deref() {
            if title != tournament.title {
                self.ensure_title_free(title).await?;
            }
        }

        tournament.apply(changes)?;
        repo.update(tournament.clone()).await?;
        self.commit().await?;

        Ok(tournament)
    }

    async fn delete(&self, id: TournamentId) -> AppResult<u64> {
        self.uow.tournaments().remove(id).await?;
        let removed = self.commit().await?;

        tracing::info!(tournament_id = id, removed, "Tournament deleted");
        Ok(removed)
    }
}
