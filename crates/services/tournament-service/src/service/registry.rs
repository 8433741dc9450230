//! Lazy service registry.
//!
//! Services are registered as factories and constructed on first resolution.
//! Construction happens at most once per registry even when many tasks
//! resolve the same service at the same time; every caller gets the same
//! shared instance.

use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use common::{AppError, AppResult};

/// Registry key of the tournament service
pub const TOURNAMENT_SERVICE: &str = "TournamentService";

/// Registry key of the game service
pub const GAME_SERVICE: &str = "GameService";

type Factory<T> = Box<dyn Fn() -> AppResult<T> + Send + Sync>;

/// A value constructed by its factory on first access.
///
/// Concurrent first accesses block on the cell until the single running
/// factory finishes. A failed factory leaves the value unconstructed.
pub struct Lazy<T> {
    factory: Factory<T>,
    cell: OnceCell<T>,
}

impl<T> Lazy<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> AppResult<T> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    /// Get the value, constructing it if this is the first access.
    pub fn get(&self) -> AppResult<&T> {
        self.cell.get_or_try_init(|| (self.factory)())
    }

    pub fn is_constructed(&self) -> bool {
        self.cell.get().is_some()
    }
}

type SharedService = Arc<dyn Any + Send + Sync>;

/// Keyed collection of lazily constructed services.
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<&'static str, Lazy<SharedService>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `key`, replacing any previous registration.
    pub fn register<T, F>(&mut self, key: &'static str, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> AppResult<T> + Send + Sync + 'static,
    {
        let lazy = Lazy::new(move || {
            let service = factory()?;
            tracing::debug!(service = key, "Constructed service");
            Ok(Arc::new(service) as SharedService)
        });
        self.services.insert(key, lazy);
    }

    /// Resolve the service registered under `key`.
    ///
    /// `T` must be the exact type the factory produces; services are usually
    /// registered as `Arc<dyn Trait>` so resolving clones the shared handle.
    pub fn resolve<T>(&self, key: &str) -> AppResult<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let lazy = self
            .services
            .get(key)
            .ok_or_else(|| AppError::internal(format!("Service '{}' is not registered", key)))?;

        let service = lazy.get()?;
        (**service)
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Service '{}' is not a {}",
                    key,
                    std::any::type_name::<T>()
                ))
            })
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.services.contains_key(key)
    }

    /// Whether the service under `key` has been constructed yet
    pub fn is_resolved(&self, key: &str) -> bool {
        self.services
            .get(key)
            .is_some_and(Lazy::is_constructed)
    }
}
