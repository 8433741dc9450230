//! Application services layer - Use cases over the data-access core.
//!
//! Services depend on the `UnitOfWork` abstraction and are constructed
//! lazily through a per-scope `ServiceRegistry`.

mod game_service;
pub mod manager;
pub mod registry;
#[cfg(test)]
mod testing;
mod tournament_service;

// Service Manager
pub use manager::{ServiceManager, ServiceScope, Services};
pub use registry::{Lazy, ServiceRegistry, GAME_SERVICE, TOURNAMENT_SERVICE};

// Service traits and implementations
pub use game_service::{GameManager, GameService};
pub use tournament_service::{TournamentManager, TournamentService};

#[cfg(any(test, feature = "test-utils"))]
pub use manager::MockServiceManager;
