//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod game;
pub mod tournament;

pub use game::{Entity as GameEntity, Model as GameModel};
pub use tournament::{Entity as TournamentEntity, Model as TournamentModel};
