//! Integration tests for the foreign-key delete rules.
//!
//! The store, not application code, enforces:
//! - deleting a user CASCADEs to their adoption requests and SET NULLs the
//!   actor reference on their rescue reports;
//! - deleting an animal SET NULLs the references on rescue reports and
//!   adoption requests, preserving the historical rows.

use sqlx::SqlitePool;

use pawres_db::models::adoption_request::CreateAdoptionRequest;
use pawres_db::models::animal::CreateAnimal;
use pawres_db::models::rescue_report::CreateRescueReport;
use pawres_db::models::status::AnimalStatus;
use pawres_db::models::user::CreateUser;
use pawres_db::repositories::{
    AdoptionRequestRepo, AnimalRepo, RescueReportRepo, UserRepo,
};

async fn seed(pool: &SqlitePool) -> (i64, i64, i64, i64) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Reporter".to_string(),
            email: "reporter@example.com".to_string(),
            phone: None,
            password_hash: None,
            role: None,
        },
    )
    .await
    .unwrap();

    let animal = AnimalRepo::create(
        pool,
        &CreateAnimal {
            species: "Dog".to_string(),
            status: Some(AnimalStatus::Healthy),
            ..CreateAnimal::default()
        },
    )
    .await
    .unwrap();

    let report = RescueReportRepo::create(
        pool,
        &CreateRescueReport {
            user_id: Some(user.id),
            location: "Old mill".to_string(),
            ..CreateRescueReport::default()
        },
    )
    .await
    .unwrap();

    let request = AdoptionRequestRepo::create(
        pool,
        &CreateAdoptionRequest {
            user_id: user.id,
            animal_id: animal.id,
            contact: "reporter@example.com".to_string(),
            reason: None,
        },
    )
    .await
    .unwrap();

    (user.id, animal.id, report.id, request.id)
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn test_user_delete_cascades_requests_and_nulls_reports(pool: SqlitePool) {
    let (user_id, _animal_id, report_id, request_id) = seed(&pool).await;

    assert!(UserRepo::hard_delete(&pool, user_id).await.unwrap());

    // The request is gone (CASCADE).
    let request = AdoptionRequestRepo::find_by_id(&pool, request_id)
        .await
        .unwrap();
    assert!(request.is_none(), "adoption request should cascade");

    // The report survives with its actor reference nulled (SET NULL).
    let report = RescueReportRepo::find_by_id(&pool, report_id)
        .await
        .unwrap()
        .expect("rescue report must survive user deletion");
    assert_eq!(report.user_id, None);
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn test_animal_delete_nulls_request_reference(pool: SqlitePool) {
    let (_user_id, animal_id, _report_id, request_id) = seed(&pool).await;

    assert!(AnimalRepo::hard_delete(&pool, animal_id).await.unwrap());

    // The request survives as a historical record with a null animal.
    let request = AdoptionRequestRepo::find_by_id(&pool, request_id)
        .await
        .unwrap()
        .expect("adoption request must survive animal deletion");
    assert_eq!(request.animal_id, None);
}

#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn test_animal_delete_nulls_report_link(pool: SqlitePool) {
    let report = RescueReportRepo::create(
        &pool,
        &CreateRescueReport {
            location: "Dockside".to_string(),
            animal_type: Some("cat".to_string()),
            ..CreateRescueReport::default()
        },
    )
    .await
    .unwrap();
    let animal = AnimalRepo::create_from_rescue(&pool, &report).await.unwrap();
    RescueReportRepo::set_animal(&pool, report.id, Some(animal.id))
        .await
        .unwrap();

    AnimalRepo::hard_delete(&pool, animal.id).await.unwrap();

    let report = RescueReportRepo::find_by_id(&pool, report.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        report.animal_id, None,
        "report link should be nulled, not deleted"
    );
}
