//! Lazy registry and service scope integration tests.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_test::assert_ok;

use common::{AppError, Pagination};
use domain::{NewTournament, TournamentFilter, UpdateTournament};
use tournament_service_lib::infra::UnitOfWork;
use tournament_service_lib::service::{
    ServiceManager, ServiceRegistry, ServiceScope, Services, TournamentManager, TournamentService,
    TOURNAMENT_SERVICE,
};

use support::{day, test_database};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_resolution_constructs_once() {
    let db = test_database().await;
    let uow: Arc<dyn UnitOfWork> = Arc::new(db.session());
    let constructed = Arc::new(AtomicUsize::new(0));

    let mut registry = ServiceRegistry::new();
    let counter = constructed.clone();
    registry.register(TOURNAMENT_SERVICE, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        // Widen the window in which other resolvers race the construction
        std::thread::sleep(Duration::from_millis(20));
        Ok(Arc::new(TournamentManager::new(uow.clone())) as Arc<dyn TournamentService>)
    });
    let services = Arc::new(Services::new(registry));

    let handles: Vec<_> = (0..1000)
        .map(|_| {
            let services = services.clone();
            tokio::spawn(async move { services.tournaments() })
        })
        .collect();

    let mut resolved = Vec::with_capacity(handles.len());
    for handle in handles {
        resolved.push(assert_ok!(assert_ok!(handle.await)));
    }

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(resolved.iter().all(|service| Arc::ptr_eq(service, &resolved[0])));
}

#[tokio::test]
async fn test_factory_error_reaches_caller() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let mut registry = ServiceRegistry::new();
    let counter = attempts.clone();
    registry.register::<Arc<dyn TournamentService>, _>(TOURNAMENT_SERVICE, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(AppError::internal("store unavailable"))
    });
    let services = Services::new(registry);

    let err = services.tournaments().err().expect("factory error should propagate");
    assert!(matches!(err, AppError::Internal(msg) if msg == "store unavailable"));
    assert!(services.tournaments().is_err());

    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert!(!services.registry().is_resolved(TOURNAMENT_SERVICE));
}

#[tokio::test]
async fn test_unregistered_service_is_internal_error() {
    let services = Services::new(ServiceRegistry::new());

    assert!(matches!(services.games(), Err(AppError::Internal(_))));
}

#[tokio::test]
async fn test_new_scope_builds_new_instances() {
    let db = test_database().await;

    let first_scope = ServiceScope::begin(db.connection());
    let second_scope = ServiceScope::begin(db.connection());

    let a = assert_ok!(first_scope.tournaments());
    let b = assert_ok!(first_scope.tournaments());
    let c = assert_ok!(second_scope.tournaments());

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
}

#[tokio::test]
async fn test_scope_services_share_one_session() {
    let db = test_database().await;
    let scope = ServiceScope::begin(db.connection());

    let tournaments = assert_ok!(scope.tournaments());
    let games = assert_ok!(scope.games());

    let created = assert_ok!(
        tournaments
            .create(NewTournament::new("Spring Cup", day(1)).with_game("Final", day(3)))
            .await
    );
    assert_eq!(created.games.len(), 1);

    let listed = assert_ok!(games.games_for_tournament(created.id).await);
    assert_eq!(listed, created.games);

    let duplicate = tournaments
        .create(NewTournament::new("Spring Cup", day(2)))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let renamed = assert_ok!(
        tournaments
            .update(
                created.id,
                UpdateTournament {
                    title: Some("Spring Masters".to_string()),
                    start_date: None,
                },
            )
            .await
    );
    assert_eq!(renamed.title, "Spring Masters");

    let page = assert_ok!(
        tournaments
            .get_all(TournamentFilter::default(), Pagination::default())
            .await
    );
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].title, "Spring Masters");

    assert_eq!(assert_ok!(tournaments.delete(created.id).await), 2);
    assert!(matches!(
        games.games_for_tournament(created.id).await,
        Err(AppError::NotFound)
    ));

    assert_eq!(assert_ok!(scope.complete().await), 0);
}
