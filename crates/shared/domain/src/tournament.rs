//! Tournament domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ensure_title, validate_fields, DomainResult};
use crate::game::Game;

/// Store-generated tournament identifier
pub type TournamentId = i32;

/// Tournament domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Tournament {
    pub id: TournamentId,
    #[validate(length(min = 1, max = 100, message = "Tournament title must be between 1 and 100 characters"))]
    pub title: String,
    pub start_date: DateTime<Utc>,
    /// Only populated when the read asked for games
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub games: Vec<Game>,
}

impl Tournament {
    /// Check the title invariant before the entity is staged for update.
    pub fn ensure_valid(&self) -> DomainResult<()> {
        validate_fields(self)?;
        ensure_title("Tournament", &self.title)
    }

    /// Apply a partial update after validating it.
    ///
    /// The identifier is never touched.
    pub fn apply(&mut self, changes: UpdateTournament) -> DomainResult<()> {
        changes.ensure_valid()?;

        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(start_date) = changes.start_date {
            self.start_date = start_date;
        }
        Ok(())
    }
}

/// Tournament creation data, optionally with its initial games
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTournament {
    #[validate(length(min = 1, max = 100, message = "Tournament title must be between 1 and 100 characters"))]
    pub title: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub games: Vec<NewTournamentGame>,
}

impl NewTournament {
    pub fn new(title: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start_date,
            games: Vec::new(),
        }
    }

    /// Add a game to be inserted together with the tournament.
    pub fn with_game(mut self, title: impl Into<String>, time: DateTime<Utc>) -> Self {
        self.games.push(NewTournamentGame {
            title: title.into(),
            time,
        });
        self
    }

    /// Check required fields of the tournament and every nested game.
    pub fn ensure_valid(&self) -> DomainResult<()> {
        validate_fields(self)?;
        ensure_title("Tournament", &self.title)?;
        for game in &self.games {
            validate_fields(game)?;
            ensure_title("Game", &game.title)?;
        }
        Ok(())
    }
}

/// A game created as part of a new tournament
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTournamentGame {
    #[validate(length(min = 1, max = 100, message = "Game title must be between 1 and 100 characters"))]
    pub title: String,
    pub time: DateTime<Utc>,
}

/// Tournament update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTournament {
    #[validate(length(min = 1, max = 100, message = "Tournament title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
}

impl UpdateTournament {
    pub fn ensure_valid(&self) -> DomainResult<()> {
        validate_fields(self)?;
        match &self.title {
            Some(title) => ensure_title("Tournament", title),
            None => Ok(()),
        }
    }
}

/// Criteria for listing tournaments
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentFilter {
    /// Case-sensitive substring match on the title
    pub title: Option<String>,
    /// Inclusive lower bound on the start date
    pub starts_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the start date
    pub starts_before: Option<DateTime<Utc>>,
    #[serde(default)]
    pub include_games: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainError;

    #[test]
    fn new_tournament_rejects_blank_title() {
        let err = NewTournament::new("  ", Utc::now()).ensure_valid().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_tournament_rejects_long_title() {
        let title = "x".repeat(101);
        assert!(NewTournament::new(title, Utc::now()).ensure_valid().is_err());
    }

    #[test]
    fn new_tournament_validates_nested_games() {
        let tournament = NewTournament::new("Winter Cup", Utc::now()).with_game("", Utc::now());
        let err = tournament.ensure_valid().unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Game title must be between 1 and 100 characters")
        );
    }

    #[test]
    fn apply_changes_title_and_keeps_id() {
        let mut tournament = Tournament {
            id: 3,
            title: "Old".to_string(),
            start_date: Utc::now(),
            games: Vec::new(),
        };

        tournament
            .apply(UpdateTournament {
                title: Some("New".to_string()),
                start_date: None,
            })
            .unwrap();

        assert_eq!(tournament.id, 3);
        assert_eq!(tournament.title, "New");
    }
}
