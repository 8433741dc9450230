//! Game service - Handles game use cases.

use async_trait::async_trait;
use futures::TryStreamExt;
use std::sync::Arc;

use common::{AppError, AppResult, Paginated, Pagination};
use domain::{Game, GameFilter, GameId, NewGame, TournamentId, UpdateGame};

use crate::infra::UnitOfWork;

/// Game service trait for dependency injection.
///
/// Mutating operations commit the session before returning.
#[async_trait]
pub trait GameService: Send + Sync {
    /// List games page by page with the total match count
    async fn get_all(&self, filter: GameFilter, pagination: Pagination) -> AppResult<Paginated<Game>>;

    async fn get_by_id(&self, id: GameId) -> AppResult<Game>;

    /// All games of an existing tournament
    async fn games_for_tournament(&self, tournament_id: TournamentId) -> AppResult<Vec<Game>>;

    /// Create a game in an existing tournament
    async fn create(&self, game: NewGame) -> AppResult<Game>;

    /// Update title and/or time
    async fn update(&self, id: GameId, changes: UpdateGame) -> AppResult<Game>;

    async fn delete(&self, id: GameId) -> AppResult<()>;
}

/// Concrete implementation of GameService using Unit of Work.
pub struct GameManager {
    uow: Arc<dyn UnitOfWork>,
}

impl GameManager {
    /// Create new game service instance with Unit of Work
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl GameService for GameManager {
    async fn get_all(&self, filter: GameFilter, pagination: Pagination) -> AppResult<Paginated<Game>> {
        let repo = self.uow.games();

        let (total, data) = futures::try_join!(
            repo.count(filter.clone()),
            repo.get_all(filter, pagination).try_collect::<Vec<_>>(),
        )?;

        Ok(Paginated::new(data, pagination, total))
    }

    async fn get_by_id(&self, id: GameId) -> AppResult<Game> {
        self.uow.games().get_by_id(id).await
    }

    async fn games_for_tournament(&self, tournament_id: TournamentId) -> AppResult<Vec<Game>> {
        if !self.uow.tournaments().exists(tournament_id).await? {
            return Err(AppError::NotFound);
        }
        self.uow.games().get_by_tournament(tournament_id).await
    }

    async fn create(&self, game: NewGame) -> AppResult<Game> {
        let staged = self.uow.games().add(game).await?;
        self.uow.commit().await?;

        let created = staged.persisted()?;
        tracing::info!(
            game_id = created.id,
            tournament_id = created.tournament_id,
            "Game created"
        );
        Ok(created)
    }

    async fn update(&self, id: GameId, changes: UpdateGame) -> AppResult<Game> {
        let repo = self.uow.games();
        let mut game = repo.get_by_id(id).await?;

        game.apply(changes)?;
        repo.update(game.clone()).await?;
        self.uow.commit().await?;

        Ok(game)
    }

    async fn delete(&self, id: GameId) -> AppResult<()> {
        self.uow.games().remove(id).await?;
        self.uow.commit().await?;

        tracing::info!(game_id = id, "Game deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures::StreamExt;
    use mockall::predicate::eq;

    use crate::repository::{MockGameRepository, MockTournamentRepository, Staged};
    use crate::service::testing::TestUnitOfWork;

    fn create_test_game(id: GameId, tournament_id: TournamentId) -> Game {
        Game {
            id,
            tournament_id,
            title: "Final".to_string(),
            time: Utc.with_ymd_and_hms(2024, 5, 4, 18, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_games_for_missing_tournament() {
        let mut tournaments = MockTournamentRepository::new();
        tournaments.expect_exists().with(eq(9)).returning(|_| Ok(false));
        let mut games = MockGameRepository::new();
        games.expect_get_by_tournament().never();

        let service = GameManager::new(Arc::new(TestUnitOfWork::new(tournaments, games)));
        let result = service.games_for_tournament(9).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_games_for_tournament_without_games() {
        let mut tournaments = MockTournamentRepository::new();
        tournaments.expect_exists().returning(|_| Ok(true));
        let mut games = MockGameRepository::new();
        games.expect_get_by_tournament().returning(|_| Ok(Vec::new()));

        let service = GameManager::new(Arc::new(TestUnitOfWork::new(tournaments, games)));
        let result = service.games_for_tournament(1).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_create_in_missing_tournament() {
        let mut games = MockGameRepository::new();
        games
            .expect_add()
            .returning(|g| Err(AppError::validation(format!("Tournament {} does not exist", g.tournament_id))));

        let uow = Arc::new(TestUnitOfWork::new(MockTournamentRepository::new(), games));
        let service = GameManager::new(uow.clone());
        let result = service
            .create(NewGame::new(99, "Final", Utc::now()))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(uow.commits(), 0);
    }

    #[tokio::test]
    async fn test_create_commits_and_returns_persisted() {
        let mut games = MockGameRepository::new();
        games
            .expect_add()
            .returning(|g| Ok(Staged::resolved(create_test_game(5, g.tournament_id))));

        let uow = Arc::new(TestUnitOfWork::new(MockTournamentRepository::new(), games));
        let service = GameManager::new(uow.clone());
        let created = service
            .create(NewGame::new(2, "Final", Utc::now()))
            .await
            .unwrap();

        assert_eq!(created.id, 5);
        assert_eq!(created.tournament_id, 2);
        assert_eq!(uow.commits(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_tournament() {
        let mut games = MockGameRepository::new();
        games
            .expect_get_by_id()
            .returning(|id| Ok(create_test_game(id, 3)));
        games
            .expect_update()
            .withf(|g| g.title == "Grand Final" && g.tournament_id == 3)
            .times(1)
            .returning(|_| Ok(()));

        let uow = Arc::new(TestUnitOfWork::new(MockTournamentRepository::new(), games));
        let service = GameManager::new(uow.clone());
        let changes = UpdateGame {
            title: Some("Grand Final".to_string()),
            time: None,
        };
        let updated = service.update(4, changes).await.unwrap();

        assert_eq!(updated.title, "Grand Final");
        assert_eq!(uow.commits(), 1);
    }

    #[tokio::test]
    async fn test_get_all_counts_matches() {
        let mut games = MockGameRepository::new();
        games.expect_count().returning(|_| Ok(0));
        games
            .expect_get_all()
            .returning(|_, _| futures::stream::empty().boxed());

        let service = GameManager::new(Arc::new(TestUnitOfWork::new(
            MockTournamentRepository::new(),
            games,
        )));
        let page = service
            .get_all(GameFilter::for_tournament(1), Pagination::default())
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.meta.total_pages, 0);
    }
}
