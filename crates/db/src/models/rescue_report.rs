//! Rescue report entity model and DTOs.

use pawres_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::{RescueStatus, Urgency};

/// A rescue report row from the `rescue_reports` table.
///
/// `animal_id` is set exactly once, by the transition into `rescued`, and is
/// cleared only when that transition is reverted and the spawned animal is
/// deleted. `user_id` is nullable: anonymous and emergency reports carry
/// reporter contact fields instead.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RescueReport {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub animal_id: Option<DbId>,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub animal_type: Option<String>,
    pub animal_name: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_phone: Option<String>,
    pub urgency: Urgency,
    pub status: RescueStatus,
    pub notes: Option<String>,
    pub rescued_at: Option<Timestamp>,
    pub archived_at: Option<Timestamp>,
    pub archived_by: Option<DbId>,
    pub archive_note: Option<String>,
    pub removed_at: Option<Timestamp>,
    pub removed_by: Option<DbId>,
    pub removal_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a rescue report.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateRescueReport {
    /// Reporting user; `None` for anonymous/emergency reports.
    pub user_id: Option<DbId>,
    #[validate(length(min = 1, max = 500))]
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[validate(length(max = 100))]
    pub animal_type: Option<String>,
    #[validate(length(max = 100))]
    pub animal_name: Option<String>,
    #[validate(length(max = 100))]
    pub reporter_name: Option<String>,
    #[validate(length(max = 20))]
    pub reporter_phone: Option<String>,
    pub urgency: Option<Urgency>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
