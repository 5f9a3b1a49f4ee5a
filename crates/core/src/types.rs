use serde::{Deserialize, Serialize};

/// All database primary keys are SQLite AUTOINCREMENT integers.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The four entity kinds managed by the transition engine.
///
/// Used for archive/remove dispatch and audit records. `as_str` yields the
/// table-name form accepted in route paths and stored in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Users,
    Animals,
    RescueReports,
    AdoptionRequests,
}

impl EntityKind {
    /// Table-name form, e.g. `"rescue_reports"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Animals => "animals",
            Self::RescueReports => "rescue_reports",
            Self::AdoptionRequests => "adoption_requests",
        }
    }

    /// Singular label used in error messages, e.g. `"RescueReport"`.
    pub const fn entity_label(self) -> &'static str {
        match self {
            Self::Users => "User",
            Self::Animals => "Animal",
            Self::RescueReports => "RescueReport",
            Self::AdoptionRequests => "AdoptionRequest",
        }
    }

    /// Parse the table-name form. Returns `None` for unknown kinds.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "users" => Some(Self::Users),
            "animals" => Some(Self::Animals),
            "rescue_reports" => Some(Self::RescueReports),
            "adoption_requests" => Some(Self::AdoptionRequests),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-scoped actor identity, passed explicitly into every engine
/// operation instead of being looked up from ambient session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    /// The user performing the operation.
    pub actor_id: DbId,
}

impl ActorContext {
    pub const fn new(actor_id: DbId) -> Self {
        Self { actor_id }
    }
}
