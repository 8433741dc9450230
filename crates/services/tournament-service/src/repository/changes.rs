//! Pending change buffer shared by a unit of work and its repositories.
//!
//! Repositories only stage changes here. Nothing reaches the store until the
//! owning unit of work drains the buffer inside one transaction.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::OnceCell;

use common::{AppError, AppResult};
use domain::{Game, GameId, NewGame, NewTournament, Tournament, TournamentId};

/// Handle to an entity staged for insertion.
///
/// The store assigns identifiers at commit time, so the persisted entity is
/// only available once the owning unit of work has committed successfully.
#[derive(Debug, Clone)]
pub struct Staged<T> {
    slot: Arc<OnceCell<T>>,
}

impl<T: Clone> Staged<T> {
    pub(crate) fn pending() -> Self {
        Self {
            slot: Arc::new(OnceCell::new()),
        }
    }

    /// A handle that is already backed by a persisted entity.
    pub fn resolved(value: T) -> Self {
        Self {
            slot: Arc::new(OnceCell::with_value(value)),
        }
    }

    pub(crate) fn resolve(&self, value: T) {
        // A slot belongs to exactly one staged change, which commits at most once
        let _ = self.slot.set(value);
    }

    pub fn is_persisted(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Persisted entity, if the commit has happened
    pub fn get(&self) -> Option<T> {
        self.slot.get().cloned()
    }

    /// Persisted entity, or an internal error when read before commit.
    pub fn persisted(&self) -> AppResult<T> {
        self.get()
            .ok_or_else(|| AppError::internal("Staged entity read before its unit of work committed"))
    }
}

/// A staged tournament mutation
#[derive(Debug)]
pub(crate) enum TournamentChange {
    Insert {
        tournament: NewTournament,
        slot: Staged<Tournament>,
    },
    Update(Tournament),
    /// Cascades to the tournament's games
    Remove(TournamentId),
}

/// A staged game mutation
#[derive(Debug)]
pub(crate) enum GameChange {
    Insert { game: NewGame, slot: Staged<Game> },
    Update(Game),
    Remove(GameId),
}

#[derive(Debug)]
pub(crate) enum PendingChange {
    Tournament(TournamentChange),
    Game(GameChange),
}

impl From<TournamentChange> for PendingChange {
    fn from(change: TournamentChange) -> Self {
        PendingChange::Tournament(change)
    }
}

impl From<GameChange> for PendingChange {
    fn from(change: GameChange) -> Self {
        PendingChange::Game(change)
    }
}

/// Persisted entity waiting to be handed to its `Staged` handle.
///
/// Held back until the transaction commits so a rolled-back insert never
/// becomes visible through its handle.
#[derive(Debug)]
pub(crate) enum Resolution {
    Tournament(Staged<Tournament>, Tournament),
    Game(Staged<Game>, Game),
}

impl Resolution {
    pub(crate) fn finish(self) {
        match self {
            Resolution::Tournament(slot, tournament) => slot.resolve(tournament),
            Resolution::Game(slot, game) => slot.resolve(game),
        }
    }
}

/// Outcome of applying one staged change inside a transaction
#[derive(Debug)]
pub(crate) struct Applied {
    pub(crate) affected: u64,
    pub(crate) resolution: Option<Resolution>,
}

impl Applied {
    pub(crate) fn rows(affected: u64) -> Self {
        Self {
            affected,
            resolution: None,
        }
    }

    pub(crate) fn inserted(affected: u64, resolution: Resolution) -> Self {
        Self {
            affected,
            resolution: Some(resolution),
        }
    }
}

/// Ordered buffer of staged changes. Cloning shares the same buffer.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChangeSet {
    pending: Arc<Mutex<Vec<PendingChange>>>,
}

impl ChangeSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingChange>> {
        // The guard is never held across an await or a panic-prone call
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn stage(&self, change: impl Into<PendingChange>) {
        self.lock().push(change.into());
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Drain every staged change in staging order.
    pub(crate) fn take(&self) -> Vec<PendingChange> {
        std::mem::take(&mut *self.lock())
    }
}
