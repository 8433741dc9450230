//! Tournament repository implementation.
//!
//! Reads go straight to committed state. Writes are validated, checked
//! against committed state and staged in the unit of work's change buffer.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select,
};

use super::changes::{Applied, ChangeSet, Resolution, Staged, TournamentChange};
use super::entities::{game, tournament, GameEntity, TournamentEntity};
use super::game_repository::games_of;
use super::stream::{paged, EntityStream};
use common::{AppError, AppResult, OptionExt, Pagination};
use domain::{Game, NewTournament, Tournament, TournamentFilter, TournamentId};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Tournament repository trait for dependency injection.
///
/// Reads reflect committed state only; changes staged in the same unit of
/// work become visible after it commits.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Stage a new tournament (with any initial games) for insertion
    async fn add(&self, tournament: NewTournament) -> AppResult<Staged<Tournament>>;

    /// Find tournament by ID, optionally loading its games
    async fn get_by_id(&self, id: TournamentId, include_games: bool) -> AppResult<Tournament>;

    /// Lazily stream matching tournaments ordered by ID
    fn get_all(&self, filter: TournamentFilter, pagination: Pagination) -> EntityStream<Tournament>;

    /// Count tournaments matching the filter
    async fn count(&self, filter: TournamentFilter) -> AppResult<u64>;

    /// Check whether a tournament exists
    async fn exists(&self, id: TournamentId) -> AppResult<bool>;

    /// Check whether a tournament with exactly this title exists
    async fn exists_by_title(&self, title: &str) -> AppResult<bool>;

    /// Stage new field values for an existing tournament (games are ignored)
    async fn update(&self, tournament: Tournament) -> AppResult<()>;

    /// Stage removal of a tournament together with its games
    async fn remove(&self, id: TournamentId) -> AppResult<()>;
}

/// Concrete implementation of TournamentRepository
pub struct TournamentStore {
    db: DatabaseConnection,
    changes: ChangeSet,
}

impl TournamentStore {
    /// Create repository staging into the given change buffer
    pub(crate) fn new(db: DatabaseConnection, changes: ChangeSet) -> Self {
        Self { db, changes }
    }

    fn filtered(filter: &TournamentFilter) -> Select<TournamentEntity> {
        let mut query = TournamentEntity::find();

        if let Some(title) = &filter.title {
            query = query.filter(tournament::Column::Title.contains(title.as_str()));
        }
        if let Some(after) = filter.starts_after {
            query = query.filter(tournament::Column::StartDate.gte(after));
        }
        if let Some(before) = filter.starts_before {
            query = query.filter(tournament::Column::StartDate.lte(before));
        }

        query.order_by_asc(tournament::Column::Id)
    }
}

#[async_trait]
impl TournamentRepository for TournamentStore {
    async fn add(&self, tournament: NewTournament) -> AppResult<Staged<Tournament>> {
        tournament.ensure_valid()?;

        let slot = Staged::pending();
        self.changes.stage(TournamentChange::Insert {
            tournament,
            slot: slot.clone(),
        });
        Ok(slot)
    }

    async fn get_by_id(&self, id: TournamentId, include_games: bool) -> AppResult<Tournament> {
        let model = TournamentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut tournament = Tournament::from(model);
        if include_games {
            tournament.games = games_of(&self.db, id).await?;
        }
        Ok(tournament)
    }

    fn get_all(&self, filter: TournamentFilter, pagination: Pagination) -> EntityStream<Tournament> {
        let tournaments = paged(
            self.db.clone(),
            Self::filtered(&filter),
            pagination,
            Tournament::from,
        );
        if !filter.include_games {
            return tournaments;
        }

        let db = self.db.clone();
        tournaments
            .and_then(move |mut tournament| {
                let db = db.clone();
                async move {
                    tournament.games = games_of(&db, tournament.id).await?;
                    Ok::<_, AppError>(tournament)
                }
            })
            .boxed()
    }

    async fn count(&self, filter: TournamentFilter) -> AppResult<u64> {
        Self::filtered(&filter)
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn exists(&self, id: TournamentId) -> AppResult<bool> {
        let count = TournamentEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn exists_by_title(&self, title: &str) -> AppResult<bool> {
        let count = TournamentEntity::find()
            .filter(tournament::Column::Title.eq(title))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn update(&self, tournament: Tournament) -> AppResult<()> {
        tournament.ensure_valid()?;
        if !self.exists(tournament.id).await? {
            return Err(AppError::NotFound);
        }

        self.changes.stage(TournamentChange::Update(tournament));
        Ok(())
    }

    async fn remove(&self, id: TournamentId) -> AppResult<()> {
        if !self.exists(id).await? {
            return Err(AppError::NotFound);
        }

        self.changes.stage(TournamentChange::Remove(id));
        Ok(())
    }
}

/// Apply one staged tournament change inside the committing transaction.
pub(crate) async fn apply<C: ConnectionTrait>(txn: &C, change: TournamentChange) -> Result<Applied, DbErr> {
    match change {
        TournamentChange::Insert { tournament: staged, slot } => {
            let NewTournament {
                title,
                start_date,
                games,
            } = staged;

            let model = tournament::ActiveModel {
                id: NotSet,
                title: Set(title),
                start_date: Set(start_date),
            }
            .insert(txn)
            .await?;

            let mut inserted = Vec::with_capacity(games.len());
            for game in games {
                let game_model = game::ActiveModel {
                    id: NotSet,
                    tournament_id: Set(model.id),
                    title: Set(game.title),
                    time: Set(game.time),
                }
                .insert(txn)
                .await?;
                inserted.push(Game::from(game_model));
            }

            let affected = 1 + inserted.len() as u64;
            let mut persisted = Tournament::from(model);
            persisted.games = inserted;
            Ok(Applied::inserted(affected, Resolution::Tournament(slot, persisted)))
        }
        TournamentChange::Update(updated) => {
            // Fails with RecordNotUpdated if the row vanished since staging
            tournament::ActiveModel {
                id: Unchanged(updated.id),
                title: Set(updated.title),
                start_date: Set(updated.start_date),
            }
            .update(txn)
            .await?;
            Ok(Applied::rows(1))
        }
        TournamentChange::Remove(id) => {
            let games = GameEntity::delete_many()
                .filter(game::Column::TournamentId.eq(id))
                .exec(txn)
                .await?
                .rows_affected;

            let removed = TournamentEntity::delete_by_id(id).exec(txn).await?.rows_affected;
            if removed == 0 {
                return Err(DbErr::RecordNotFound(format!("Tournament {} no longer exists", id)));
            }
            Ok(Applied::rows(games + removed))
        }
    }
}
