//! Repository for the `animals` table.

use chrono::Utc;
use pawres_core::types::DbId;
use sqlx::SqliteExecutor;

use crate::models::animal::{Animal, CreateAnimal};
use crate::models::rescue_report::RescueReport;
use crate::models::status::AnimalStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, species, breed, age, status, description, photo, \
    rescue_report_id, archived_at, archived_by, archive_note, removed_at, removed_by, \
    removal_reason, created_at, updated_at";

/// Provides CRUD operations for animals.
pub struct AnimalRepo;

impl AnimalRepo {
    /// Insert a directly-entered animal, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `needs_setup`.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        input: &CreateAnimal,
    ) -> Result<Animal, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO animals
                (name, species, breed, age, status, description, photo, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Animal>(&query)
            .bind(&input.name)
            .bind(&input.species)
            .bind(&input.breed)
            .bind(input.age)
            .bind(input.status.unwrap_or_default())
            .bind(&input.description)
            .bind(&input.photo)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Insert an animal spawned by a report's transition into `rescued`,
    /// populated from the report's cached descriptors. The row starts in
    /// `needs_setup` and carries a back-reference to the report.
    pub async fn create_from_rescue(
        executor: impl SqliteExecutor<'_>,
        report: &RescueReport,
    ) -> Result<Animal, sqlx::Error> {
        let species = canonical_species(report.animal_type.as_deref());
        let name = report
            .animal_name
            .clone()
            .unwrap_or_else(|| format!("Rescued {species}"));
        let description = format!("Rescued from: {}. Awaiting admin setup.", report.location);

        let now = Utc::now();
        let query = format!(
            "INSERT INTO animals
                (name, species, status, description, rescue_report_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Animal>(&query)
            .bind(name)
            .bind(species)
            .bind(AnimalStatus::NeedsSetup)
            .bind(description)
            .bind(report.id)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Find an animal by internal ID.
    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Animal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM animals WHERE id = ?");
        sqlx::query_as::<_, Animal>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all non-hidden animals.
    pub async fn list_active(
        executor: impl SqliteExecutor<'_>,
    ) -> Result<Vec<Animal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM animals
             WHERE archived_at IS NULL AND removed_at IS NULL
             ORDER BY id"
        );
        sqlx::query_as::<_, Animal>(&query).fetch_all(executor).await
    }

    /// List animals open to adoption requests: the three available health
    /// substates, excluding hidden rows and `needs_setup` records awaiting
    /// admin completion.
    pub async fn list_available(
        executor: impl SqliteExecutor<'_>,
    ) -> Result<Vec<Animal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM animals
             WHERE status IN ('healthy', 'recovering', 'injured')
               AND archived_at IS NULL AND removed_at IS NULL
             ORDER BY id"
        );
        sqlx::query_as::<_, Animal>(&query).fetch_all(executor).await
    }

    /// Set the canonical status. Returns `true` if a row changed.
    pub async fn set_status(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        status: AnimalStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE animals SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete an animal. The store nulls references on rescue
    /// reports and adoption requests (SET NULL rules).
    pub async fn hard_delete(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM animals WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fold a report's free-form animal type into a canonical species label.
fn canonical_species(animal_type: Option<&str>) -> String {
    let raw = animal_type.unwrap_or("Other").trim();
    match raw.to_ascii_lowercase().as_str() {
        "dog" | "dogs" => "Dog".to_string(),
        "cat" | "cats" => "Cat".to_string(),
        "other" | "others" | "unknown" | "" => "Other".to_string(),
        _ => {
            let mut chars = raw.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => "Other".to_string(),
            }
        }
    }
}
