//! Game repository implementation.

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select,
};

use super::changes::{Applied, ChangeSet, GameChange, Resolution, Staged};
use super::entities::{game, GameEntity, TournamentEntity};
use super::stream::{paged, EntityStream};
use common::{AppError, AppResult, OptionExt, Pagination};
use domain::{Game, GameFilter, GameId, NewGame, TournamentId};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Game repository trait for dependency injection.
///
/// Reads reflect committed state only.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Stage a new game; its tournament must already be committed
    async fn add(&self, game: NewGame) -> AppResult<Staged<Game>>;

    /// Find game by ID
    async fn get_by_id(&self, id: GameId) -> AppResult<Game>;

    /// Lazily stream matching games ordered by ID
    fn get_all(&self, filter: GameFilter, pagination: Pagination) -> EntityStream<Game>;

    /// Count games matching the filter
    async fn count(&self, filter: GameFilter) -> AppResult<u64>;

    /// All games of one tournament ordered by ID (empty if it has none)
    async fn get_by_tournament(&self, tournament_id: TournamentId) -> AppResult<Vec<Game>>;

    /// Stage new field values for an existing game; its tournament cannot change
    async fn update(&self, game: Game) -> AppResult<()>;

    /// Stage removal of a game
    async fn remove(&self, id: GameId) -> AppResult<()>;
}

/// Concrete implementation of GameRepository
pub struct GameStore {
    db: DatabaseConnection,
    changes: ChangeSet,
}

impl GameStore {
    /// Create repository staging into the given change buffer
    pub(crate) fn new(db: DatabaseConnection, changes: ChangeSet) -> Self {
        Self { db, changes }
    }

    fn filtered(filter: &GameFilter) -> Select<GameEntity> {
        let mut query = GameEntity::find();

        if let Some(title) = &filter.title {
            query = query.filter(game::Column::Title.contains(title.as_str()));
        }
        if let Some(tournament_id) = filter.tournament_id {
            query = query.filter(game::Column::TournamentId.eq(tournament_id));
        }

        query.order_by_asc(game::Column::Id)
    }

    async fn exists(&self, id: GameId) -> AppResult<bool> {
        let count = GameEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl GameRepository for GameStore {
    async fn add(&self, game: NewGame) -> AppResult<Staged<Game>> {
        game.ensure_valid()?;

        let owner = TournamentEntity::find_by_id(game.tournament_id)
            .count(&self.db)
            .await?;
        if owner == 0 {
            return Err(AppError::validation(format!(
                "Tournament {} does not exist",
                game.tournament_id
            )));
        }

        let slot = Staged::pending();
        self.changes.stage(GameChange::Insert {
            game,
            slot: slot.clone(),
        });
        Ok(slot)
    }

    async fn get_by_id(&self, id: GameId) -> AppResult<Game> {
        GameEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Game::from)
            .ok_or_not_found()
    }

    fn get_all(&self, filter: GameFilter, pagination: Pagination) -> EntityStream<Game> {
        paged(self.db.clone(), Self::filtered(&filter), pagination, Game::from)
    }

    async fn count(&self, filter: GameFilter) -> AppResult<u64> {
        Self::filtered(&filter)
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn get_by_tournament(&self, tournament_id: TournamentId) -> AppResult<Vec<Game>> {
        games_of(&self.db, tournament_id)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, game: Game) -> AppResult<()> {
        game.ensure_valid()?;
        let current = GameEntity::find_by_id(game.id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        // Games cannot move between tournaments
        if current.tournament_id != game.tournament_id {
            return Err(AppError::validation(format!(
                "Game {} belongs to tournament {}",
                game.id, current.tournament_id
            )));
        }

        self.changes.stage(GameChange::Update(game));
        Ok(())
    }

    async fn remove(&self, id: GameId) -> AppResult<()> {
        if !self.exists(id).await? {
            return Err(AppError::NotFound);
        }

        self.changes.stage(GameChange::Remove(id));
        Ok(())
    }
}

/// Load the games of a tournament ordered by ID.
pub(crate) async fn games_of<C: ConnectionTrait>(
    db: &C,
    tournament_id: TournamentId,
) -> Result<Vec<Game>, DbErr> {
    let models = GameEntity::find()
        .filter(game::Column::TournamentId.eq(tournament_id))
        .order_by_asc(game::Column::Id)
        .all(db)
        .await?;

    Ok(models.into_iter().map(Game::from).collect())
}

/// Apply one staged game change inside the committing transaction.
pub(crate) async fn apply<C: ConnectionTrait>(txn: &C, change: GameChange) -> Result<Applied, DbErr> {
    match change {
        GameChange::Insert { game: staged, slot } => {
            // The foreign key rejects an owner removed after staging
            let model = game::ActiveModel {
                id: NotSet,
                tournament_id: Set(staged.tournament_id),
                title: Set(staged.title),
                time: Set(staged.time),
            }
            .insert(txn)
            .await?;
            Ok(Applied::inserted(1, Resolution::Game(slot, Game::from(model))))
        }
        GameChange::Update(updated) => {
            game::ActiveModel {
                id: Unchanged(updated.id),
                tournament_id: Unchanged(updated.tournament_id),
                title: Set(updated.title),
                time: Set(updated.time),
            }
            .update(txn)
            .await?;
            Ok(Applied::rows(1))
        }
        GameChange::Remove(id) => {
            let removed = GameEntity::delete_by_id(id).exec(txn).await?.rows_affected;
            if removed == 0 {
                return Err(DbErr::RecordNotFound(format!("Game {} no longer exists", id)));
            }
            Ok(Applied::rows(removed))
        }
    }
}
