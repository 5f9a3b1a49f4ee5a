//! CSV animal intake.
//!
//! Legacy exports carry free-form status strings, sometimes still in the old
//! compound encoding (`"adopted|archived"`, `"removed"`). This is the
//! ingestion boundary where those strings are mapped to canonical variants
//! and orthogonal soft-delete flags -- exactly once, so nothing downstream
//! ever parses a status string again.
//!
//! Rows are validated individually; invalid rows are reported back with
//! their line numbers while valid rows import. The whole batch runs in one
//! store transaction with a single summarizing audit entry.

use futures::future::FutureExt;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use pawres_core::audit::actions;
use pawres_core::types::{ActorContext, DbId, EntityKind};
use pawres_db::models::animal::CreateAnimal;
use pawres_db::models::status::AnimalStatus;
use pawres_db::repositories::{AnimalRepo, AuditRepo, TrashRepo};

use crate::cache::namespaces;
use crate::engine::TransitionEngine;
use crate::error::{EngineError, EngineResult};

/// Headers that must be present in the CSV.
const REQUIRED_HEADERS: &[&str] = &["name", "animal_type", "age", "health_status"];

/// Note attached to rows whose legacy status carried a soft-delete marker.
const LEGACY_IMPORT_NOTE: &str = "carried over from legacy import";

/// One row of the legacy animal export.
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    animal_type: Option<String>,
    #[serde(default)]
    breed: Option<String>,
    #[serde(default)]
    age: Option<String>,
    #[serde(default)]
    health_status: Option<String>,
    #[serde(default)]
    photo: Option<String>,
}

/// A rejected row, reported with its 1-based line number (line 1 is the
/// header).
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    pub row: usize,
    pub message: String,
}

/// Result of an import batch.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub imported: Vec<DbId>,
    pub errors: Vec<ImportRowError>,
}

impl TransitionEngine {
    /// Import animals from CSV data with headers
    /// `name, animal_type, breed, age, health_status, photo`.
    pub async fn import_animals_csv(
        &self,
        data: &[u8],
        ctx: ActorContext,
    ) -> EngineResult<ImportOutcome> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| EngineError::validation(format!("Invalid CSV data: {e}")))?
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();
        let missing: Vec<&str> = REQUIRED_HEADERS
            .iter()
            .filter(|required| !headers.iter().any(|h| h == *required))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::validation(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
        }

        // Parse and validate everything up front; only clean rows reach the
        // transaction.
        let mut errors = Vec::new();
        let mut rows = Vec::new();
        for (index, record) in reader.deserialize::<ImportRow>().enumerate() {
            let line = index + 2; // line 1 is the header
            match record {
                Ok(row) => match parse_row(row) {
                    Ok(parsed) => rows.push(parsed),
                    Err(message) => errors.push(ImportRowError { row: line, message }),
                },
                Err(e) => errors.push(ImportRowError {
                    row: line,
                    message: format!("Unreadable row: {e}"),
                }),
            }
        }

        let imported = self
            .store()
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let mut imported = Vec::with_capacity(rows.len());
                    for row in rows {
                        let animal = AnimalRepo::create(&mut *conn, &row.input).await?;
                        // Legacy soft-delete markers become orthogonal
                        // metadata on the fresh row.
                        if row.removed {
                            TrashRepo::remove(
                                &mut *conn,
                                EntityKind::Animals,
                                animal.id,
                                ctx.actor_id,
                                LEGACY_IMPORT_NOTE,
                            )
                            .await?;
                        } else if row.archived {
                            TrashRepo::archive(
                                &mut *conn,
                                EntityKind::Animals,
                                animal.id,
                                ctx.actor_id,
                                Some(LEGACY_IMPORT_NOTE),
                            )
                            .await?;
                        }
                        imported.push(animal.id);
                    }

                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::IMPORT_COMPLETED,
                        EntityKind::Animals,
                        0,
                        Some(serde_json::json!({ "imported": imported.len() })),
                    )
                    .await?;
                    Ok::<_, EngineError>(imported)
                }
                .boxed()
            })
            .await?;

        self.cache().invalidate(namespaces::ANIMALS);
        self.cache().invalidate(namespaces::DASHBOARD);
        tracing::info!(
            imported = imported.len(),
            rejected = errors.len(),
            "animal import completed"
        );
        Ok(ImportOutcome { imported, errors })
    }
}

#[derive(Debug)]
struct ParsedRow {
    input: CreateAnimal,
    archived: bool,
    removed: bool,
}

fn parse_row(row: ImportRow) -> Result<ParsedRow, String> {
    let name = row.name.filter(|n| !n.is_empty());
    if name.is_none() {
        return Err("Missing animal name".to_string());
    }
    let species = row
        .animal_type
        .filter(|t| !t.is_empty())
        .ok_or_else(|| "Missing animal_type".to_string())?;

    let age = match row.age.as_deref().filter(|a| !a.is_empty()) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| format!("Invalid age '{raw}'"))?,
        ),
        None => None,
    };

    // The one place legacy status strings are interpreted.
    let legacy = AnimalStatus::decode_legacy(row.health_status.as_deref().unwrap_or(""));

    Ok(ParsedRow {
        input: CreateAnimal {
            name,
            species,
            breed: row.breed.filter(|b| !b.is_empty()),
            age,
            status: Some(legacy.status),
            description: None,
            photo: row.photo.filter(|p| !p.is_empty()),
        },
        archived: legacy.archived,
        removed: legacy.removed,
    })
}
