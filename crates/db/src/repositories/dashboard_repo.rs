//! Aggregate counts for the admin dashboard.
//!
//! These queries back the short-TTL query cache; they read whole tables and
//! are the expensive reads the cache exists to absorb.

use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

/// Dashboard summary counts. Hidden (archived/removed) rows are excluded
/// except where noted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub total_animals: i64,
    pub adoptable_animals: i64,
    pub adopted_animals: i64,
    pub open_rescue_reports: i64,
    pub high_urgency_reports: i64,
    pub pending_adoption_requests: i64,
    pub approved_adoption_requests: i64,
}

/// Provides aggregate read operations.
pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn counts(
        executor: impl SqliteExecutor<'_>,
    ) -> Result<DashboardCounts, sqlx::Error> {
        // One round trip: SQLite evaluates the scalar subqueries in a single
        // statement.
        let row: (i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM animals
                  WHERE archived_at IS NULL AND removed_at IS NULL),
                (SELECT COUNT(*) FROM animals
                  WHERE status IN ('healthy', 'recovering', 'injured')
                    AND archived_at IS NULL AND removed_at IS NULL),
                (SELECT COUNT(*) FROM animals
                  WHERE status = 'adopted'
                    AND archived_at IS NULL AND removed_at IS NULL),
                (SELECT COUNT(*) FROM rescue_reports
                  WHERE status IN ('pending', 'on_going')
                    AND archived_at IS NULL AND removed_at IS NULL),
                (SELECT COUNT(*) FROM rescue_reports
                  WHERE urgency = 'high' AND status IN ('pending', 'on_going')
                    AND archived_at IS NULL AND removed_at IS NULL),
                (SELECT COUNT(*) FROM adoption_requests
                  WHERE status = 'pending'
                    AND archived_at IS NULL AND removed_at IS NULL),
                (SELECT COUNT(*) FROM adoption_requests
                  WHERE status = 'approved'
                    AND archived_at IS NULL AND removed_at IS NULL)",
        )
        .fetch_one(executor)
        .await?;

        Ok(DashboardCounts {
            total_animals: row.0,
            adoptable_animals: row.1,
            adopted_animals: row.2,
            open_rescue_reports: row.3,
            high_urgency_reports: row.4,
            pending_adoption_requests: row.5,
            approved_adoption_requests: row.6,
        })
    }
}
