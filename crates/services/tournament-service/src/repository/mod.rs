//! Repository layer for data access.
//!
//! Repositories read committed state directly and stage writes into the
//! change buffer of the unit of work that created them.

pub(crate) mod changes;
pub mod entities;
mod game_repository;
pub mod stream;
mod tournament_repository;

pub use changes::Staged;
pub use game_repository::{GameRepository, GameStore};
pub use stream::EntityStream;
pub use tournament_repository::{TournamentRepository, TournamentStore};

pub(crate) use game_repository::apply as apply_game_change;
pub(crate) use tournament_repository::apply as apply_tournament_change;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use game_repository::MockGameRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tournament_repository::MockTournamentRepository;
