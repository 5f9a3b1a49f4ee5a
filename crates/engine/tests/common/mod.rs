//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use sqlx::SqlitePool;

use pawres_core::types::{ActorContext, DbId};
use pawres_db::models::adoption_request::CreateAdoptionRequest;
use pawres_db::models::animal::CreateAnimal;
use pawres_db::models::rescue_report::CreateRescueReport;
use pawres_db::models::status::AnimalStatus;
use pawres_db::models::user::CreateUser;
use pawres_db::repositories::UserRepo;
use pawres_db::Store;
use pawres_engine::{QueryCache, TransitionEngine};

/// Engine over the test fixture pool.
pub fn engine(pool: SqlitePool) -> TransitionEngine {
    TransitionEngine::new(Store::from_pool(pool), QueryCache::default())
}

/// Create a user directly and return an actor context for them.
pub async fn actor(pool: &SqlitePool, email: &str, role: &str) -> ActorContext {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: format!("{role} {email}"),
            email: email.to_string(),
            phone: None,
            password_hash: None,
            role: Some(role.to_string()),
        },
    )
    .await
    .expect("fixture user");
    ActorContext::new(user.id)
}

pub fn report_input(location: &str) -> CreateRescueReport {
    CreateRescueReport {
        location: location.to_string(),
        animal_type: Some("dog".to_string()),
        animal_name: Some("Biscuit".to_string()),
        ..CreateRescueReport::default()
    }
}

pub fn animal_input(species: &str, status: AnimalStatus) -> CreateAnimal {
    CreateAnimal {
        species: species.to_string(),
        status: Some(status),
        ..CreateAnimal::default()
    }
}

pub fn request_input(user_id: DbId, animal_id: DbId) -> CreateAdoptionRequest {
    CreateAdoptionRequest {
        user_id,
        animal_id,
        contact: "applicant@example.com".to_string(),
        reason: Some("fenced yard, prior experience".to_string()),
    }
}
