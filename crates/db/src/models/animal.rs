//! Animal entity model and DTOs.

use pawres_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::AnimalStatus;

/// An animal row from the `animals` table.
///
/// `rescue_report_id` is the back-reference to the report whose `rescued`
/// transition created this animal; animals entered directly by an
/// administrator carry `None`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Animal {
    pub id: DbId,
    pub name: Option<String>,
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<i64>,
    pub status: AnimalStatus,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub rescue_report_id: Option<DbId>,
    pub archived_at: Option<Timestamp>,
    pub archived_by: Option<DbId>,
    pub archive_note: Option<String>,
    pub removed_at: Option<Timestamp>,
    pub removed_by: Option<DbId>,
    pub removal_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Animal {
    /// Listed publicly and eligible for adoption requests.
    pub fn is_available(&self) -> bool {
        self.status.is_available() && self.archived_at.is_none() && self.removed_at.is_none()
    }
}

/// DTO for direct (admin) animal entry.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateAnimal {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub species: String,
    #[validate(length(max = 100))]
    pub breed: Option<String>,
    pub age: Option<i64>,
    /// Defaults to `needs_setup` if omitted.
    pub status: Option<AnimalStatus>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub photo: Option<String>,
}
