//! The transition engine: entity creation, status transitions, and the
//! cross-entity derived effects they trigger.
//!
//! Invariants enforced here:
//! - a `(from, to)` pair outside the status registry's transition table is
//!   rejected before any write;
//! - every multi-step mutation executes inside exactly one store
//!   transaction, so partial application is never observable;
//! - at most one adoption request per animal is ever `approved`, and an
//!   animal is `adopted` iff its approving request is;
//! - cache namespaces touched by a mutation are invalidated after commit.

use futures::future::FutureExt;
use serde::Serialize;
use sqlx::SqliteConnection;
use validator::Validate;

use pawres_core::audit::actions;
use pawres_core::types::{ActorContext, DbId, EntityKind, Timestamp};
use pawres_db::models::adoption_request::{
    AdoptionRequest, CreateAdoptionRequest, SYSTEM_DENIAL_REASON,
};
use pawres_db::models::animal::{Animal, CreateAnimal};
use pawres_db::models::rescue_report::{CreateRescueReport, RescueReport};
use pawres_db::models::status::{AdoptionStatus, AnimalStatus, RescueStatus};
use pawres_db::models::user::{CreateUser, User, ROLE_ADMIN, ROLE_MEMBER};
use pawres_db::repositories::{
    AdoptionRequestRepo, AnimalRepo, AuditRepo, RescueReportRepo, UserRepo,
};
use pawres_db::Store;

use crate::cache::{namespaces, QueryCache};
use crate::error::{EngineError, EngineResult};

/// Result of a rescue report transition.
#[derive(Debug, Clone, Serialize)]
pub struct RescueOutcome {
    pub report_id: DbId,
    pub from: RescueStatus,
    pub to: RescueStatus,
    /// Animal spawned by a transition into `rescued`.
    pub created_animal_id: Option<DbId>,
    /// Animal deleted by a guarded revert out of `rescued`.
    pub deleted_animal_id: Option<DbId>,
}

/// Result of an adoption approval.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome {
    pub request_id: DbId,
    pub animal_id: DbId,
    pub approved_at: Timestamp,
    /// Sibling requests auto-denied with the system reason.
    pub auto_denied: Vec<DbId>,
}

/// Orchestrates all workflow mutations. Holds the store and an explicit
/// cache handle; no ambient global state.
#[derive(Clone)]
pub struct TransitionEngine {
    store: Store,
    cache: QueryCache,
}

impl TransitionEngine {
    pub fn new(store: Store, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // -----------------------------------------------------------------------
    // Creation operations
    // -----------------------------------------------------------------------

    /// Submit a rescue report. Reports start `pending`; anonymous reports
    /// carry reporter contact fields instead of a user reference.
    pub async fn create_rescue_report(
        &self,
        input: CreateRescueReport,
    ) -> EngineResult<RescueReport> {
        input.validate()?;

        let report = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let report = RescueReportRepo::create(&mut *conn, &input).await?;
                    AuditRepo::append(
                        conn,
                        report.user_id,
                        actions::REPORT_SUBMITTED,
                        EntityKind::RescueReports,
                        report.id,
                        Some(serde_json::json!({
                            "urgency": report.urgency,
                            "location": report.location.clone(),
                        })),
                    )
                    .await?;
                    Ok::<_, EngineError>(report)
                }
                .boxed()
            })
            .await?;

        self.cache.invalidate(namespaces::RESCUES);
        self.cache.invalidate(namespaces::DASHBOARD);
        tracing::info!(report_id = report.id, "rescue report submitted");
        Ok(report)
    }

    /// Enter an animal directly (admin flow). Direct entries carry no
    /// rescue back-reference.
    pub async fn create_animal(
        &self,
        input: CreateAnimal,
        ctx: ActorContext,
    ) -> EngineResult<Animal> {
        input.validate()?;

        let animal = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let animal = AnimalRepo::create(&mut *conn, &input).await?;
                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::ANIMAL_CREATED,
                        EntityKind::Animals,
                        animal.id,
                        Some(serde_json::json!({ "status": animal.status })),
                    )
                    .await?;
                    Ok::<_, EngineError>(animal)
                }
                .boxed()
            })
            .await?;

        self.cache.invalidate(namespaces::ANIMALS);
        self.cache.invalidate(namespaces::DASHBOARD);
        Ok(animal)
    }

    /// Submit an adoption request for an animal. Whether a user may hold
    /// several active requests for one animal is caller policy, not
    /// engine-enforced.
    pub async fn create_adoption_request(
        &self,
        input: CreateAdoptionRequest,
    ) -> EngineResult<AdoptionRequest> {
        input.validate()?;

        let request = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let animal = AnimalRepo::find_by_id(&mut *conn, input.animal_id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("Animal", input.animal_id))?;
                    if animal.removed_at.is_some() {
                        return Err(EngineError::not_found("Animal", input.animal_id));
                    }

                    let request = AdoptionRequestRepo::create(&mut *conn, &input).await?;
                    AuditRepo::append(
                        conn,
                        Some(request.user_id),
                        actions::REQUEST_SUBMITTED,
                        EntityKind::AdoptionRequests,
                        request.id,
                        Some(serde_json::json!({ "animal_id": request.animal_id })),
                    )
                    .await?;
                    Ok::<_, EngineError>(request)
                }
                .boxed()
            })
            .await?;

        self.cache.invalidate(namespaces::ADOPTIONS);
        self.cache.invalidate(namespaces::DASHBOARD);
        Ok(request)
    }

    /// Register a user. Passwords are hashed by the caller; the engine only
    /// validates shape and role.
    pub async fn create_user(
        &self,
        input: CreateUser,
        ctx: Option<ActorContext>,
    ) -> EngineResult<User> {
        input.validate()?;
        if let Some(role) = input.role.as_deref() {
            if role != ROLE_ADMIN && role != ROLE_MEMBER {
                return Err(EngineError::validation(format!(
                    "Invalid role '{role}'. Must be one of: {ROLE_ADMIN}, {ROLE_MEMBER}"
                )));
            }
        }

        let actor_id = ctx.map(|c| c.actor_id);
        let user = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let user = UserRepo::create(&mut *conn, &input).await?;
                    AuditRepo::append(
                        conn,
                        actor_id,
                        actions::USER_CREATED,
                        EntityKind::Users,
                        user.id,
                        Some(serde_json::json!({ "role": user.role.clone() })),
                    )
                    .await?;
                    Ok::<_, EngineError>(user)
                }
                .boxed()
            })
            .await?;

        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Rescue report transitions
    // -----------------------------------------------------------------------

    /// Apply a status transition to a rescue report, with derived effects:
    ///
    /// - into `rescued`: spawns a `needs_setup` animal from the report's
    ///   cached descriptors, links it, and stamps `rescued_at` -- all in the
    ///   same transaction as the status write;
    /// - out of `rescued`: deletes the spawned animal when it has no
    ///   adoption history, otherwise rejects the whole transition with a
    ///   conflict so history is never orphaned silently.
    pub async fn transition_rescue(
        &self,
        id: DbId,
        target: RescueStatus,
        ctx: ActorContext,
        message: Option<String>,
    ) -> EngineResult<RescueOutcome> {
        let outcome = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let report = RescueReportRepo::find_by_id(&mut *conn, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("RescueReport", id))?;
                    reject_hidden(report.archived_at, report.removed_at, "rescue report")?;

                    let from = report.status;
                    if !RescueStatus::is_valid_transition(from, target) {
                        return Err(EngineError::Core(
                            pawres_core::CoreError::InvalidTransition {
                                kind: EntityKind::RescueReports.as_str(),
                                from: from.as_str(),
                                to: target.as_str(),
                            },
                        ));
                    }

                    let mut created_animal_id = None;
                    let mut deleted_animal_id = None;

                    if target == RescueStatus::Rescued {
                        // Spawn the animal once; a report that somehow still
                        // carries a link keeps it.
                        if report.animal_id.is_none() {
                            let animal =
                                AnimalRepo::create_from_rescue(&mut *conn, &report).await?;
                            RescueReportRepo::set_animal(&mut *conn, id, Some(animal.id))
                                .await?;
                            created_animal_id = Some(animal.id);
                        }
                        RescueReportRepo::set_status(
                            &mut *conn,
                            id,
                            target,
                            Some(chrono::Utc::now()),
                        )
                        .await?;
                    } else {
                        if from == RescueStatus::Rescued {
                            if let Some(animal_id) = report.animal_id {
                                let history =
                                    AdoptionRequestRepo::count_for_animal(&mut *conn, animal_id)
                                        .await?;
                                if history > 0 {
                                    return Err(EngineError::conflict(format!(
                                        "Cannot revert rescued report {id}: animal {animal_id} \
                                         has {history} adoption request(s)"
                                    )));
                                }
                                // The SET NULL rule clears the report's link
                                // when the spawned animal row is deleted.
                                AnimalRepo::hard_delete(&mut *conn, animal_id).await?;
                                deleted_animal_id = Some(animal_id);
                            }
                        }
                        RescueReportRepo::set_status(&mut *conn, id, target, None).await?;
                    }

                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::RESCUE_TRANSITION,
                        EntityKind::RescueReports,
                        id,
                        Some(serde_json::json!({
                            "from": from,
                            "to": target,
                            "message": message,
                            "created_animal_id": created_animal_id,
                            "deleted_animal_id": deleted_animal_id,
                        })),
                    )
                    .await?;

                    Ok::<_, EngineError>(RescueOutcome {
                        report_id: id,
                        from,
                        to: target,
                        created_animal_id,
                        deleted_animal_id,
                    })
                }
                .boxed()
            })
            .await?;

        self.cache.invalidate(namespaces::RESCUES);
        self.cache.invalidate(namespaces::ANIMALS);
        self.cache.invalidate(namespaces::DASHBOARD);
        tracing::info!(
            report_id = outcome.report_id,
            from = outcome.from.as_str(),
            to = outcome.to.as_str(),
            created_animal_id = outcome.created_animal_id,
            "rescue report transitioned"
        );
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Animal transitions
    // -----------------------------------------------------------------------

    /// Move an animal between health states. `adopted` is never reachable
    /// here: it is set only by the adoption approval side effect.
    pub async fn transition_animal(
        &self,
        id: DbId,
        target: AnimalStatus,
        ctx: ActorContext,
    ) -> EngineResult<Animal> {
        let animal = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let animal = AnimalRepo::find_by_id(&mut *conn, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("Animal", id))?;
                    reject_hidden(animal.archived_at, animal.removed_at, "animal")?;

                    let from = animal.status;
                    if !AnimalStatus::is_valid_transition(from, target) {
                        return Err(EngineError::Core(
                            pawres_core::CoreError::InvalidTransition {
                                kind: EntityKind::Animals.as_str(),
                                from: from.as_str(),
                                to: target.as_str(),
                            },
                        ));
                    }

                    AnimalRepo::set_status(&mut *conn, id, target).await?;
                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::ANIMAL_TRANSITION,
                        EntityKind::Animals,
                        id,
                        Some(serde_json::json!({ "from": from, "to": target })),
                    )
                    .await?;

                    let updated = AnimalRepo::find_by_id(&mut *conn, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("Animal", id))?;
                    Ok::<_, EngineError>(updated)
                }
                .boxed()
            })
            .await?;

        self.cache.invalidate(namespaces::ANIMALS);
        self.cache.invalidate(namespaces::DASHBOARD);
        Ok(animal)
    }

    // -----------------------------------------------------------------------
    // Adoption request transitions
    // -----------------------------------------------------------------------

    /// Approve an adoption request.
    ///
    /// The animal's status is re-read inside the same write transaction the
    /// updates run in; the store serializes write transactions, so of two
    /// concurrent approvals for one animal the second observes the first's
    /// committed `adopted` status and fails with a conflict. On success,
    /// every other pending request for the animal is denied with the system
    /// reason.
    pub async fn approve_adoption(
        &self,
        id: DbId,
        ctx: ActorContext,
        message: Option<String>,
    ) -> EngineResult<ApprovalOutcome> {
        let outcome = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let request = AdoptionRequestRepo::find_by_id(&mut *conn, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("AdoptionRequest", id))?;
                    reject_hidden(request.archived_at, request.removed_at, "adoption request")?;

                    // A system auto-denial means another request for the
                    // same animal already won; that is the race outcome,
                    // not a caller mistake.
                    if request.is_system_denied() {
                        return Err(EngineError::conflict(format!(
                            "Request {id} was auto-denied: {SYSTEM_DENIAL_REASON}"
                        )));
                    }

                    if !AdoptionStatus::is_valid_transition(
                        request.status,
                        AdoptionStatus::Approved,
                    ) {
                        return Err(EngineError::Core(
                            pawres_core::CoreError::InvalidTransition {
                                kind: EntityKind::AdoptionRequests.as_str(),
                                from: request.status.as_str(),
                                to: AdoptionStatus::Approved.as_str(),
                            },
                        ));
                    }

                    let animal_id = request.animal_id.ok_or_else(|| {
                        EngineError::conflict(format!(
                            "Request {id} no longer references an animal"
                        ))
                    })?;

                    // Decision point of the whole engine: the availability
                    // re-read and the writes below share one serialized
                    // transaction, so at most one approval can win.
                    let animal = AnimalRepo::find_by_id(&mut *conn, animal_id)
                        .await?
                        .ok_or_else(|| {
                            EngineError::conflict(format!(
                                "Animal {animal_id} no longer exists"
                            ))
                        })?;
                    if !animal.is_available() {
                        return Err(EngineError::conflict(format!(
                            "Animal {animal_id} is not available for adoption (status: {})",
                            animal.status.as_str()
                        )));
                    }

                    let approved_at = chrono::Utc::now();
                    AnimalRepo::set_status(&mut *conn, animal_id, AnimalStatus::Adopted)
                        .await?;
                    AdoptionRequestRepo::approve(&mut *conn, id, approved_at).await?;
                    let auto_denied = AdoptionRequestRepo::deny_other_pending_for_animal(
                        &mut *conn,
                        animal_id,
                        id,
                        SYSTEM_DENIAL_REASON,
                    )
                    .await?;

                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::ADOPTION_APPROVED,
                        EntityKind::AdoptionRequests,
                        id,
                        Some(serde_json::json!({
                            "animal_id": animal_id,
                            "auto_denied": auto_denied.clone(),
                            "message": message,
                        })),
                    )
                    .await?;

                    Ok::<_, EngineError>(ApprovalOutcome {
                        request_id: id,
                        animal_id,
                        approved_at,
                        auto_denied,
                    })
                }
                .boxed()
            })
            .await?;

        self.cache.invalidate(namespaces::ADOPTIONS);
        self.cache.invalidate(namespaces::ANIMALS);
        self.cache.invalidate(namespaces::DASHBOARD);
        tracing::info!(
            request_id = outcome.request_id,
            animal_id = outcome.animal_id,
            auto_denied = outcome.auto_denied.len(),
            "adoption request approved"
        );
        Ok(outcome)
    }

    /// Deny an adoption request with a mandatory admin reason. Never
    /// mutates the animal.
    pub async fn deny_adoption(
        &self,
        id: DbId,
        ctx: ActorContext,
        reason: String,
        message: Option<String>,
    ) -> EngineResult<AdoptionRequest> {
        if reason.trim().is_empty() {
            return Err(EngineError::validation("Denial reason is required"));
        }

        let request = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let request = AdoptionRequestRepo::find_by_id(&mut *conn, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("AdoptionRequest", id))?;
                    reject_hidden(request.archived_at, request.removed_at, "adoption request")?;

                    if !AdoptionStatus::is_valid_transition(
                        request.status,
                        AdoptionStatus::Denied,
                    ) {
                        return Err(EngineError::Core(
                            pawres_core::CoreError::InvalidTransition {
                                kind: EntityKind::AdoptionRequests.as_str(),
                                from: request.status.as_str(),
                                to: AdoptionStatus::Denied.as_str(),
                            },
                        ));
                    }

                    AdoptionRequestRepo::deny(&mut *conn, id, &reason, Some(ctx.actor_id))
                        .await?;
                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::ADOPTION_DENIED,
                        EntityKind::AdoptionRequests,
                        id,
                        Some(serde_json::json!({ "reason": reason, "message": message })),
                    )
                    .await?;

                    let updated = AdoptionRequestRepo::find_by_id(&mut *conn, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("AdoptionRequest", id))?;
                    Ok::<_, EngineError>(updated)
                }
                .boxed()
            })
            .await?;

        self.cache.invalidate(namespaces::ADOPTIONS);
        self.cache.invalidate(namespaces::DASHBOARD);
        Ok(request)
    }

    /// Withdraw a pending request. Only the requester may cancel; a foreign
    /// request behaves as if it did not exist. Never mutates the animal.
    pub async fn cancel_adoption(
        &self,
        id: DbId,
        ctx: ActorContext,
    ) -> EngineResult<AdoptionRequest> {
        let request = self
            .store
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let request = AdoptionRequestRepo::find_by_id(&mut *conn, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("AdoptionRequest", id))?;
                    if request.user_id != ctx.actor_id {
                        return Err(EngineError::not_found("AdoptionRequest", id));
                    }
                    reject_hidden(request.archived_at, request.removed_at, "adoption request")?;

                    if !AdoptionStatus::is_valid_transition(
                        request.status,
                        AdoptionStatus::Cancelled,
                    ) {
                        return Err(EngineError::Core(
                            pawres_core::CoreError::InvalidTransition {
                                kind: EntityKind::AdoptionRequests.as_str(),
                                from: request.status.as_str(),
                                to: AdoptionStatus::Cancelled.as_str(),
                            },
                        ));
                    }

                    AdoptionRequestRepo::cancel(&mut *conn, id).await?;
                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::ADOPTION_CANCELLED,
                        EntityKind::AdoptionRequests,
                        id,
                        None,
                    )
                    .await?;

                    let updated = AdoptionRequestRepo::find_by_id(&mut *conn, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found("AdoptionRequest", id))?;
                    Ok::<_, EngineError>(updated)
                }
                .boxed()
            })
            .await?;

        self.cache.invalidate(namespaces::ADOPTIONS);
        self.cache.invalidate(namespaces::DASHBOARD);
        Ok(request)
    }
}

/// Transitions require a live row: archived entities must be restored
/// first, removed entities are permanently out of the workflow.
fn reject_hidden(
    archived_at: Option<Timestamp>,
    removed_at: Option<Timestamp>,
    label: &str,
) -> EngineResult<()> {
    if removed_at.is_some() {
        return Err(EngineError::conflict(format!("The {label} has been removed")));
    }
    if archived_at.is_some() {
        return Err(EngineError::conflict(format!(
            "The {label} is archived; restore it before changing its status"
        )));
    }
    Ok(())
}
