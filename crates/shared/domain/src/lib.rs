//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Tournaments own games; both are identified by store-generated integers.

pub mod constants;
pub mod error;
pub mod game;
pub mod tournament;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use game::{Game, GameFilter, GameId, NewGame, UpdateGame};
pub use tournament::{
    NewTournament, NewTournamentGame, Tournament, TournamentFilter, TournamentId, UpdateTournament,
};
