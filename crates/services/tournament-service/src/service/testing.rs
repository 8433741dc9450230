//! Unit of Work double for service tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use common::{AppError, AppResult};

use crate::infra::UnitOfWork;
use crate::repository::{
    GameRepository, MockGameRepository, MockTournamentRepository, TournamentRepository,
};

/// Test mock for UnitOfWork that wraps mock repositories and counts commits
pub(crate) struct TestUnitOfWork {
    tournament_repo: Arc<MockTournamentRepository>,
    game_repo: Arc<MockGameRepository>,
    commits: AtomicUsize,
    fail_commits: AtomicBool,
}

impl TestUnitOfWork {
    pub(crate) fn new(tournaments: MockTournamentRepository, games: MockGameRepository) -> Self {
        Self {
            tournament_repo: Arc::new(tournaments),
            game_repo: Arc::new(games),
            commits: AtomicUsize::new(0),
            fail_commits: AtomicBool::new(false),
        }
    }

    /// Successful commits so far
    pub(crate) fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Make every following commit fail like a rejected transaction
    pub(crate) fn fail_commits(&self) {
        self.fail_commits.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn tournaments(&self) -> Arc<dyn TournamentRepository> {
        self.tournament_repo.clone()
    }

    fn games(&self) -> Arc<dyn GameRepository> {
        self.game_repo.clone()
    }

    fn pending_changes(&self) -> usize {
        0
    }

    fn discard(&self) -> usize {
        0
    }

    async fn commit(&self) -> AppResult<u64> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(AppError::from(sea_orm::DbErr::Custom(
                "transaction rejected".to_string(),
            )));
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }
}
