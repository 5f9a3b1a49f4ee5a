//! CSV intake: legacy status strings are mapped to canonical variants and
//! orthogonal soft-delete flags exactly once, at this boundary.

mod common;

use sqlx::SqlitePool;

use common::{actor, engine};
use pawres_db::models::status::AnimalStatus;
use pawres_db::repositories::AnimalRepo;

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn import_normalizes_legacy_statuses_at_the_edge(pool: SqlitePool) {
    let engine = engine(pool.clone());
    let admin = actor(&pool, "admin@example.com", "admin").await;

    let csv = "\
name,animal_type,breed,age,health_status,photo
Rex,dog,Labrador,3,Healthy,
Mittens,cat,,2,ON-GOING IS NOT AN ANIMAL STATE,
Luna,cat,,4,recovering|archived,
Ghost,dog,,5,removed,
";
    let outcome = engine.import_animals_csv(csv.as_bytes(), admin).await.unwrap();
    assert_eq!(outcome.imported.len(), 4);
    assert!(outcome.errors.is_empty());

    let rex = AnimalRepo::find_by_id(&pool, outcome.imported[0]).await.unwrap().unwrap();
    assert_eq!(rex.status, AnimalStatus::Healthy);
    assert_eq!(rex.breed.as_deref(), Some("Labrador"));

    // Unrecognized status drifts to the hidden default, never an error.
    let mittens = AnimalRepo::find_by_id(&pool, outcome.imported[1]).await.unwrap().unwrap();
    assert_eq!(mittens.status, AnimalStatus::NeedsSetup);

    // Legacy compound encoding becomes canonical status + archive metadata.
    let luna = AnimalRepo::find_by_id(&pool, outcome.imported[2]).await.unwrap().unwrap();
    assert_eq!(luna.status, AnimalStatus::Recovering);
    assert!(luna.archived_at.is_some());

    // Legacy removed marker becomes removal metadata.
    let ghost = AnimalRepo::find_by_id(&pool, outcome.imported[3]).await.unwrap().unwrap();
    assert!(ghost.removed_at.is_some());
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn import_reports_bad_rows_and_keeps_good_ones(pool: SqlitePool) {
    let engine = engine(pool.clone());
    let admin = actor(&pool, "admin@example.com", "admin").await;

    let csv = "\
name,animal_type,breed,age,health_status,photo
Rex,dog,,3,healthy,
,dog,,2,healthy,
Bella,cat,,not-a-number,injured,
";
    let outcome = engine.import_animals_csv(csv.as_bytes(), admin).await.unwrap();
    assert_eq!(outcome.imported.len(), 1);
    assert_eq!(outcome.errors.len(), 2);
    assert_eq!(outcome.errors[0].row, 3);
    assert!(outcome.errors[0].message.contains("name"));
    assert_eq!(outcome.errors[1].row, 4);
    assert!(outcome.errors[1].message.contains("Invalid age"));
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn import_rejects_missing_headers(pool: SqlitePool) {
    let engine = engine(pool.clone());
    let admin = actor(&pool, "admin@example.com", "admin").await;

    let csv = "name,breed\nRex,Lab\n";
    let err = engine.import_animals_csv(csv.as_bytes(), admin).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Missing required columns"));
    assert!(message.contains("animal_type"));
    assert!(message.contains("health_status"));
}
