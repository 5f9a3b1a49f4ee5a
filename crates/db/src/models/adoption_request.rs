//! Adoption request entity model and DTOs.

use pawres_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::AdoptionStatus;

/// System-generated denial reason applied to sibling requests when another
/// request for the same animal is approved. Distinguished from admin
/// denials by `denied_by` being `NULL`.
pub const SYSTEM_DENIAL_REASON: &str = "Animal was adopted by another applicant";

/// An adoption request row from the `adoption_requests` table.
///
/// `animal_id` is nullable so the historical record survives a hard-deleted
/// animal. `was_approved` is immutable once set: it records that the request
/// was ever approved, even if the row is later archived.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdoptionRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub animal_id: Option<DbId>,
    pub contact: String,
    pub reason: Option<String>,
    pub status: AdoptionStatus,
    pub denial_reason: Option<String>,
    /// Denying actor; `None` marks a system-generated auto-denial.
    pub denied_by: Option<DbId>,
    pub was_approved: bool,
    pub approved_at: Option<Timestamp>,
    pub archived_at: Option<Timestamp>,
    pub archived_by: Option<DbId>,
    pub archive_note: Option<String>,
    pub removed_at: Option<Timestamp>,
    pub removed_by: Option<DbId>,
    pub removal_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdoptionRequest {
    /// True when the denial was applied by the engine rather than an admin.
    pub fn is_system_denied(&self) -> bool {
        self.status == AdoptionStatus::Denied && self.denied_by.is_none()
    }
}

/// DTO for submitting an adoption request.
///
/// Whether a user may hold several active requests for the same animal is a
/// caller policy; the engine does not enforce uniqueness here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdoptionRequest {
    pub user_id: DbId,
    pub animal_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub contact: String,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}
