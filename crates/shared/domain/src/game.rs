//! Game domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ensure_title, validate_fields, DomainResult};
use crate::tournament::TournamentId;

/// Store-generated game identifier
pub type GameId = i32;

/// Game domain entity. Always owned by exactly one tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Game {
    pub id: GameId,
    pub tournament_id: TournamentId,
    #[validate(length(min = 1, max = 100, message = "Game title must be between 1 and 100 characters"))]
    pub title: String,
    /// Scheduled start of the game
    pub time: DateTime<Utc>,
}

impl Game {
    pub fn ensure_valid(&self) -> DomainResult<()> {
        validate_fields(self)?;
        ensure_title("Game", &self.title)
    }

    /// Apply a partial update after validating it.
    pub fn apply(&mut self, changes: UpdateGame) -> DomainResult<()> {
        changes.ensure_valid()?;

        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(time) = changes.time {
            self.time = time;
        }
        Ok(())
    }
}

/// Game creation data for an existing tournament
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewGame {
    /// Owning tournament; must already exist
    pub tournament_id: TournamentId,
    #[validate(length(min = 1, max = 100, message = "Game title must be between 1 and 100 characters"))]
    pub title: String,
    pub time: DateTime<Utc>,
}

impl NewGame {
    pub fn new(tournament_id: TournamentId, title: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            tournament_id,
            title: title.into(),
            time,
        }
    }

    /// Check required fields before the game is staged.
    pub fn ensure_valid(&self) -> DomainResult<()> {
        validate_fields(self)?;
        ensure_title("Game", &self.title)
    }
}

/// Game update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGame {
    #[validate(length(min = 1, max = 100, message = "Game title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    pub time: Option<DateTime<Utc>>,
}

impl UpdateGame {
    pub fn ensure_valid(&self) -> DomainResult<()> {
        validate_fields(self)?;
        match &self.title {
            Some(title) => ensure_title("Game", title),
            None => Ok(()),
        }
    }
}

/// Criteria for listing games
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameFilter {
    /// Case-sensitive substring match on the title
    pub title: Option<String>,
    pub tournament_id: Option<TournamentId>,
}

impl GameFilter {
    pub fn for_tournament(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id: Some(tournament_id),
            ..Self::default()
        }
    }
}
