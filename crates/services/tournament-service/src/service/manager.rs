//! Service Manager - Lazy, per-scope access to application services.
//!
//! SOLID (DIP): Callers depend on service traits, not implementations.
//!
//! A `ServiceScope` is the composition root of one logical operation: one
//! unit of work session, one registry, and the services built over them on
//! first use. Scopes are never shared between concurrent operations.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::registry::{ServiceRegistry, GAME_SERVICE, TOURNAMENT_SERVICE};
use super::{GameManager, GameService, TournamentManager, TournamentService};
use crate::infra::{Persistence, UnitOfWork};
use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service manager trait for dependency injection.
///
/// Each accessor constructs its service on first call and returns the same
/// instance afterwards.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceManager: Send + Sync {
    /// Get tournament service
    fn tournaments(&self) -> AppResult<Arc<dyn TournamentService>>;

    /// Get game service
    fn games(&self) -> AppResult<Arc<dyn GameService>>;
}

/// Concrete implementation of ServiceManager over a lazy registry
pub struct Services {
    registry: ServiceRegistry,
}

impl Services {
    pub fn new(registry: ServiceRegistry) -> Self {
        Self { registry }
    }

    /// Register every service over one unit of work session
    pub fn from_unit_of_work(uow: Arc<dyn UnitOfWork>) -> Self {
        let mut registry = ServiceRegistry::new();

        let session = uow.clone();
        registry.register(TOURNAMENT_SERVICE, move || {
            Ok(Arc::new(TournamentManager::new(session.clone())) as Arc<dyn TournamentService>)
        });

        let session = uow;
        registry.register(GAME_SERVICE, move || {
            Ok(Arc::new(GameManager::new(session.clone())) as Arc<dyn GameService>)
        });

        Self::new(registry)
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }
}

impl ServiceManager for Services {
    fn tournaments(&self) -> AppResult<Arc<dyn TournamentService>> {
        self.registry.resolve(TOURNAMENT_SERVICE)
    }

    fn games(&self) -> AppResult<Arc<dyn GameService>> {
        self.registry.resolve(GAME_SERVICE)
    }
}

/// Per-operation scope owning a unit of work session and its services.
pub struct ServiceScope {
    uow: Arc<dyn UnitOfWork>,
    services: Services,
}

impl ServiceScope {
    /// Open a new session on the connection pool
    pub fn begin(db: &DatabaseConnection) -> Self {
        Self::with_unit_of_work(Arc::new(Persistence::new(db.clone())))
    }

    pub fn with_unit_of_work(uow: Arc<dyn UnitOfWork>) -> Self {
        let services = Services::from_unit_of_work(uow.clone());
        Self { uow, services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn unit_of_work(&self) -> Arc<dyn UnitOfWork> {
        self.uow.clone()
    }

    /// Commit anything still staged and close the scope.
    pub async fn complete(self) -> AppResult<u64> {
        self.uow.commit().await
    }
}

impl ServiceManager for ServiceScope {
    fn tournaments(&self) -> AppResult<Arc<dyn TournamentService>> {
        self.services.tournaments()
    }

    fn games(&self) -> AppResult<Arc<dyn GameService>> {
        self.services.games()
    }
}

impl Drop for ServiceScope {
    fn drop(&mut self) {
        let pending = self.uow.pending_changes();
        if pending > 0 {
            tracing::warn!(pending, "Service scope dropped with uncommitted changes");
        }
    }
}
