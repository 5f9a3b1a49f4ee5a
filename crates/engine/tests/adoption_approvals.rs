//! Adoption approval semantics: cascade auto-denial, the adopted/approved
//! agreement invariant, and the concurrent double-approval race.

mod common;

use assert_matches::assert_matches;
use sqlx::SqlitePool;

use common::{actor, animal_input, engine, request_input};
use pawres_core::types::ActorContext;
use pawres_core::CoreError;
use pawres_db::models::adoption_request::SYSTEM_DENIAL_REASON;
use pawres_db::models::status::{AdoptionStatus, AnimalStatus};
use pawres_db::repositories::{AdoptionRequestRepo, AnimalRepo};
use pawres_db::Store;
use pawres_engine::{EngineError, QueryCache, TransitionEngine};

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn approval_cascades_to_sibling_requests(pool: SqlitePool) {
    let engine = engine(pool.clone());
    let admin = actor(&pool, "admin@example.com", "admin").await;
    let a = actor(&pool, "a@example.com", "member").await;
    let b = actor(&pool, "b@example.com", "member").await;
    let c = actor(&pool, "c@example.com", "member").await;

    let animal = engine
        .create_animal(animal_input("Dog", AnimalStatus::Healthy), admin)
        .await
        .unwrap();
    let r1 = engine
        .create_adoption_request(request_input(a.actor_id, animal.id))
        .await
        .unwrap();
    let r2 = engine
        .create_adoption_request(request_input(b.actor_id, animal.id))
        .await
        .unwrap();
    let r3 = engine
        .create_adoption_request(request_input(c.actor_id, animal.id))
        .await
        .unwrap();

    let outcome = engine.approve_adoption(r1.id, admin, None).await.unwrap();
    let mut auto_denied = outcome.auto_denied.clone();
    auto_denied.sort_unstable();
    assert_eq!(auto_denied, vec![r2.id, r3.id]);

    // R1 approved with the historical flag; R2/R3 denied with the system
    // reason; animal adopted.
    let r1 = AdoptionRequestRepo::find_by_id(&pool, r1.id).await.unwrap().unwrap();
    assert_eq!(r1.status, AdoptionStatus::Approved);
    assert!(r1.was_approved);
    assert!(r1.approved_at.is_some());

    for id in [r2.id, r3.id] {
        let sibling = AdoptionRequestRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(sibling.status, AdoptionStatus::Denied);
        assert_eq!(sibling.denial_reason.as_deref(), Some(SYSTEM_DENIAL_REASON));
        assert!(sibling.is_system_denied());
        assert!(!sibling.was_approved);
    }

    let animal = AnimalRepo::find_by_id(&pool, animal.id).await.unwrap().unwrap();
    assert_eq!(animal.status, AnimalStatus::Adopted);
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn approving_for_unavailable_animal_is_conflict(pool: SqlitePool) {
    let engine = engine(pool.clone());
    let admin = actor(&pool, "admin@example.com", "admin").await;
    let member = actor(&pool, "m@example.com", "member").await;

    // needs_setup animals are never shown publicly and cannot be adopted.
    let animal = engine
        .create_animal(animal_input("Cat", AnimalStatus::NeedsSetup), admin)
        .await
        .unwrap();
    let request = engine
        .create_adoption_request(request_input(member.actor_id, animal.id))
        .await
        .unwrap();

    let err = engine.approve_adoption(request.id, admin, None).await.unwrap_err();
    assert!(err.is_conflict());

    let request = AdoptionRequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.status, AdoptionStatus::Pending, "rolled back fully");
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn deny_requires_reason_and_never_touches_animal(pool: SqlitePool) {
    let engine = engine(pool.clone());
    let admin = actor(&pool, "admin@example.com", "admin").await;
    let member = actor(&pool, "m@example.com", "member").await;

    let animal = engine
        .create_animal(animal_input("Dog", AnimalStatus::Recovering), admin)
        .await
        .unwrap();
    let request = engine
        .create_adoption_request(request_input(member.actor_id, animal.id))
        .await
        .unwrap();

    let err = engine
        .deny_adoption(request.id, admin, "  ".to_string(), None)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));

    let denied = engine
        .deny_adoption(request.id, admin, "home visit failed".to_string(), None)
        .await
        .unwrap();
    assert_eq!(denied.status, AdoptionStatus::Denied);
    assert_eq!(denied.denied_by, Some(admin.actor_id));
    assert!(!denied.is_system_denied());

    let animal = AnimalRepo::find_by_id(&pool, animal.id).await.unwrap().unwrap();
    assert_eq!(animal.status, AnimalStatus::Recovering, "deny never mutates the animal");

    // Terminal: a second deny is rejected.
    let err = engine
        .deny_adoption(request.id, admin, "again".to_string(), None)
        .await
        .unwrap_err();
    assert!(err.is_invalid_transition());
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn cancel_is_owner_only_and_animal_untouched(pool: SqlitePool) {
    let engine = engine(pool.clone());
    let admin = actor(&pool, "admin@example.com", "admin").await;
    let owner = actor(&pool, "owner@example.com", "member").await;
    let other = actor(&pool, "other@example.com", "member").await;

    let animal = engine
        .create_animal(animal_input("Cat", AnimalStatus::Healthy), admin)
        .await
        .unwrap();
    let request = engine
        .create_adoption_request(request_input(owner.actor_id, animal.id))
        .await
        .unwrap();

    // A foreign caller sees the request as nonexistent.
    let err = engine.cancel_adoption(request.id, other).await.unwrap_err();
    assert!(err.is_not_found());

    let cancelled = engine.cancel_adoption(request.id, owner).await.unwrap();
    assert_eq!(cancelled.status, AdoptionStatus::Cancelled);

    let animal = AnimalRepo::find_by_id(&pool, animal.id).await.unwrap().unwrap();
    assert_eq!(animal.status, AnimalStatus::Healthy);
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn adopted_iff_approved_invariant_holds(pool: SqlitePool) {
    let engine = engine(pool.clone());
    let admin = actor(&pool, "admin@example.com", "admin").await;
    let member = actor(&pool, "m@example.com", "member").await;

    let animal = engine
        .create_animal(animal_input("Dog", AnimalStatus::Healthy), admin)
        .await
        .unwrap();
    let request = engine
        .create_adoption_request(request_input(member.actor_id, animal.id))
        .await
        .unwrap();
    engine.approve_adoption(request.id, admin, None).await.unwrap();

    let approved_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM adoption_requests WHERE animal_id = ? AND status = 'approved'",
    )
    .bind(animal.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(approved_count, 1);

    let animal = AnimalRepo::find_by_id(&pool, animal.id).await.unwrap().unwrap();
    let request = AdoptionRequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(animal.status, AnimalStatus::Adopted);
    assert!(request.was_approved && request.status == AdoptionStatus::Approved);
}

/// Two concurrent approvals for one animal: exactly one wins, the loser
/// gets a conflict, and the at-most-one-approved invariant holds after.
#[tokio::test]
async fn concurrent_approvals_have_exactly_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("race.db").display());
    let store = Store::connect(&url).await.unwrap();
    store.run_migrations().await.unwrap();
    let pool = store.reader().clone();
    let engine = TransitionEngine::new(store, QueryCache::default());

    let admin = actor(&pool, "admin@example.com", "admin").await;
    let a = actor(&pool, "a@example.com", "member").await;
    let b = actor(&pool, "b@example.com", "member").await;
    let animal = engine
        .create_animal(animal_input("Dog", AnimalStatus::Healthy), admin)
        .await
        .unwrap();
    let r1 = engine
        .create_adoption_request(request_input(a.actor_id, animal.id))
        .await
        .unwrap();
    let r2 = engine
        .create_adoption_request(request_input(b.actor_id, animal.id))
        .await
        .unwrap();

    let (e1, e2) = (engine.clone(), engine.clone());
    let admin2 = ActorContext::new(admin.actor_id);
    let t1 = tokio::spawn(async move { e1.approve_adoption(r1.id, admin, None).await });
    let t2 = tokio::spawn(async move { e2.approve_adoption(r2.id, admin2, None).await });
    let first = t1.await.unwrap();
    let second = t2.await.unwrap();

    let winners = usize::from(first.is_ok()) + usize::from(second.is_ok());
    assert_eq!(winners, 1, "exactly one approval must succeed");
    let loser_err = if first.is_ok() {
        second.unwrap_err()
    } else {
        first.unwrap_err()
    };
    assert!(loser_err.is_conflict(), "loser surfaces a conflict: {loser_err}");

    let approved_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM adoption_requests WHERE animal_id = ? AND status = 'approved'",
    )
    .bind(animal.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(approved_count, 1, "at most one approved request per animal");

    let animal = AnimalRepo::find_by_id(&pool, animal.id).await.unwrap().unwrap();
    assert_eq!(animal.status, AnimalStatus::Adopted);
}
