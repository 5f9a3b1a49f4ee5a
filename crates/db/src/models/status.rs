//! Status registry: canonical lifecycle values per entity kind.
//!
//! Each kind has a closed enum stored as its canonical TEXT form. Free-form
//! and legacy strings (separator variants, renamed states, the old
//! `"status|archived"` compound encoding) are folded into canonical variants
//! exactly once, at ingestion boundaries -- import jobs and legacy-data
//! migration -- via [`normalize`](RescueStatus::normalize) and
//! [`decode_legacy`]. The engine itself only ever sees canonical variants.
//!
//! Normalization never fails: unrecognized input maps to the kind's default
//! rather than erroring, to tolerate historical data drift.

use serde::{Deserialize, Serialize};

/// Marker the legacy encoding appended to an archived row's status value.
pub const ARCHIVED_SUFFIX: &str = "|archived";

/// Legacy status value for rows soft-deleted by an administrator.
const LEGACY_REMOVED: &str = "removed";

/// Lifecycle classification of a canonical status plus its soft-delete flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Terminal,
    Archived,
    Removed,
}

/// Result of decoding a legacy status string: the canonical base status and
/// the orthogonal soft-delete flags the old encoding folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyStatus<S> {
    pub status: S,
    pub archived: bool,
    pub removed: bool,
}

/// Strip the legacy archive suffix and removed marker, returning the cleaned
/// base string plus the flags they encoded.
fn split_legacy(raw: &str) -> (String, bool, bool) {
    let lowered = raw.trim().to_ascii_lowercase();
    let archived = lowered.contains(ARCHIVED_SUFFIX);
    let base = lowered.replace(ARCHIVED_SUFFIX, "");
    let base = base.trim().to_string();
    let removed = base == LEGACY_REMOVED;
    (base, archived, removed)
}

// ---------------------------------------------------------------------------
// Rescue reports
// ---------------------------------------------------------------------------

/// Rescue report lifecycle.
///
/// `pending -> on_going -> {rescued, failed}`; `pending | on_going ->
/// cancelled`. Corrections out of `rescued` are permitted by the table but
/// guarded by the engine (they are rejected once dependent adoption history
/// exists).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RescueStatus {
    #[default]
    Pending,
    OnGoing,
    Rescued,
    Failed,
    Cancelled,
}

impl RescueStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OnGoing => "on_going",
            Self::Rescued => "rescued",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Fold a free-form string into a canonical value. Unknown input maps to
    /// the default (`pending`).
    pub fn normalize(raw: &str) -> Self {
        let (base, _, _) = split_legacy(raw);
        match base.replace([' ', '-'], "_").as_str() {
            "pending" | "" => Self::Pending,
            "on_going" | "ongoing" | "in_progress" => Self::OnGoing,
            "rescued" | "completed" => Self::Rescued,
            "failed" => Self::Failed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    /// Decode a legacy stored value into canonical status + soft-delete flags.
    pub fn decode_legacy(raw: &str) -> LegacyStatus<Self> {
        let (_, archived, removed) = split_legacy(raw);
        LegacyStatus {
            status: Self::normalize(raw),
            archived,
            removed,
        }
    }

    /// Still-open states: the report needs shelter attention.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::OnGoing)
    }

    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Targets reachable from `self` through the transition engine.
    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::OnGoing, Self::Cancelled],
            Self::OnGoing => &[Self::Rescued, Self::Failed, Self::Cancelled],
            // Corrections only; the engine guards these against dependent
            // adoption history.
            Self::Rescued => &[Self::OnGoing, Self::Failed],
            Self::Failed | Self::Cancelled => &[],
        }
    }

    pub fn is_valid_transition(from: Self, to: Self) -> bool {
        from.allowed_targets().contains(&to)
    }
}

// ---------------------------------------------------------------------------
// Adoption requests
// ---------------------------------------------------------------------------

/// Adoption request lifecycle: `pending -> {approved, denied, cancelled}`,
/// all three terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AdoptionStatus {
    #[default]
    Pending,
    Approved,
    Denied,
    Cancelled,
}

impl AdoptionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn normalize(raw: &str) -> Self {
        let (base, _, _) = split_legacy(raw);
        match base.replace([' ', '-'], "_").as_str() {
            "pending" | "" => Self::Pending,
            "approved" | "adopted" | "completed" => Self::Approved,
            "denied" | "rejected" => Self::Denied,
            "cancelled" | "canceled" | "revoked" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    pub fn decode_legacy(raw: &str) -> LegacyStatus<Self> {
        let (_, archived, removed) = split_legacy(raw);
        LegacyStatus {
            status: Self::normalize(raw),
            archived,
            removed,
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }

    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Denied, Self::Cancelled],
            Self::Approved | Self::Denied | Self::Cancelled => &[],
        }
    }

    pub fn is_valid_transition(from: Self, to: Self) -> bool {
        from.allowed_targets().contains(&to)
    }
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

/// Animal health lifecycle.
///
/// Not a strict linear machine: the three available substates move freely
/// among each other. `adopted` is reachable only through the adoption
/// approval side effect, never by a direct transition, so it never appears
/// in [`allowed_targets`](Self::allowed_targets).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AnimalStatus {
    /// Spawn sentinel for rescue-created animals: hidden from public
    /// listings until an administrator completes the record.
    #[default]
    NeedsSetup,
    Healthy,
    Recovering,
    Injured,
    Adopted,
}

impl AnimalStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeedsSetup => "needs_setup",
            Self::Healthy => "healthy",
            Self::Recovering => "recovering",
            Self::Injured => "injured",
            Self::Adopted => "adopted",
        }
    }

    pub fn normalize(raw: &str) -> Self {
        let (base, _, _) = split_legacy(raw);
        match base.replace([' ', '-'], "_").as_str() {
            "healthy" => Self::Healthy,
            "recovering" => Self::Recovering,
            "injured" => Self::Injured,
            "adopted" => Self::Adopted,
            // Legacy name for the spawn sentinel, and the drift default:
            // an unknown state is hidden until an admin sorts it out.
            _ => Self::NeedsSetup,
        }
    }

    pub fn decode_legacy(raw: &str) -> LegacyStatus<Self> {
        let (_, archived, removed) = split_legacy(raw);
        LegacyStatus {
            status: Self::normalize(raw),
            archived,
            removed,
        }
    }

    /// Every non-adopted state still belongs to the shelter's open caseload.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Adopted)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Adopted)
    }

    /// An animal may receive adoption approvals only in the three available
    /// substates, never while awaiting setup or already adopted.
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Healthy | Self::Recovering | Self::Injured)
    }

    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::NeedsSetup => &[Self::Healthy, Self::Recovering, Self::Injured],
            Self::Healthy => &[Self::Recovering, Self::Injured],
            Self::Recovering => &[Self::Healthy, Self::Injured],
            Self::Injured => &[Self::Healthy, Self::Recovering],
            Self::Adopted => &[],
        }
    }

    pub fn is_valid_transition(from: Self, to: Self) -> bool {
        from.allowed_targets().contains(&to)
    }
}

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// Rescue report urgency tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Accepts bare levels and the legacy display labels
    /// (e.g. `"High - Immediate help needed"`). Unknown input maps to
    /// `medium`.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        if lowered.starts_with("high") {
            Self::High
        } else if lowered.starts_with("low") {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle classification
// ---------------------------------------------------------------------------

/// Classify a status together with its soft-delete flags. Removal wins over
/// archival when both are somehow present in legacy data.
pub fn classify(active: bool, archived: bool, removed: bool) -> Lifecycle {
    if removed {
        Lifecycle::Removed
    } else if archived {
        Lifecycle::Archived
    } else if active {
        Lifecycle::Active
    } else {
        Lifecycle::Terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Normalization
    // -----------------------------------------------------------------------

    #[test]
    fn rescue_separator_variants_collapse() {
        for raw in ["on going", "ON-GOING", "ongoing", "on_going", "In Progress"] {
            assert_eq!(RescueStatus::normalize(raw), RescueStatus::OnGoing, "{raw}");
        }
    }

    #[test]
    fn rescue_unknown_maps_to_pending_default() {
        assert_eq!(RescueStatus::normalize("garbage"), RescueStatus::Pending);
        assert_eq!(RescueStatus::normalize(""), RescueStatus::Pending);
        assert_eq!(RescueStatus::normalize("  "), RescueStatus::Pending);
    }

    #[test]
    fn rescue_legacy_completed_is_rescued() {
        assert_eq!(RescueStatus::normalize("completed"), RescueStatus::Rescued);
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_values() {
        for status in [
            RescueStatus::Pending,
            RescueStatus::OnGoing,
            RescueStatus::Rescued,
            RescueStatus::Failed,
            RescueStatus::Cancelled,
        ] {
            assert_eq!(RescueStatus::normalize(status.as_str()), status);
        }
        for status in [
            AdoptionStatus::Pending,
            AdoptionStatus::Approved,
            AdoptionStatus::Denied,
            AdoptionStatus::Cancelled,
        ] {
            assert_eq!(AdoptionStatus::normalize(status.as_str()), status);
        }
        for status in [
            AnimalStatus::NeedsSetup,
            AnimalStatus::Healthy,
            AnimalStatus::Recovering,
            AnimalStatus::Injured,
            AnimalStatus::Adopted,
        ] {
            assert_eq!(AnimalStatus::normalize(status.as_str()), status);
        }
    }

    #[test]
    fn adoption_aliases_fold() {
        assert_eq!(AdoptionStatus::normalize("rejected"), AdoptionStatus::Denied);
        assert_eq!(AdoptionStatus::normalize("adopted"), AdoptionStatus::Approved);
        assert_eq!(AdoptionStatus::normalize("revoked"), AdoptionStatus::Cancelled);
        assert_eq!(AdoptionStatus::normalize("CANCELED"), AdoptionStatus::Cancelled);
    }

    #[test]
    fn animal_legacy_processing_is_needs_setup() {
        assert_eq!(AnimalStatus::normalize("processing"), AnimalStatus::NeedsSetup);
        assert_eq!(AnimalStatus::normalize("unknown"), AnimalStatus::NeedsSetup);
    }

    // -----------------------------------------------------------------------
    // Legacy compound decoding
    // -----------------------------------------------------------------------

    #[test]
    fn legacy_archive_suffix_decodes_to_flags() {
        let decoded = RescueStatus::decode_legacy("rescued|archived");
        assert_eq!(decoded.status, RescueStatus::Rescued);
        assert!(decoded.archived);
        assert!(!decoded.removed);
    }

    #[test]
    fn legacy_removed_decodes_to_flag_and_default() {
        let decoded = AdoptionStatus::decode_legacy("removed");
        assert!(decoded.removed);
        assert!(!decoded.archived);
        assert_eq!(decoded.status, AdoptionStatus::Pending);
    }

    #[test]
    fn plain_status_decodes_without_flags() {
        let decoded = AnimalStatus::decode_legacy("Recovering");
        assert_eq!(decoded.status, AnimalStatus::Recovering);
        assert!(!decoded.archived);
        assert!(!decoded.removed);
    }

    // -----------------------------------------------------------------------
    // Transition tables
    // -----------------------------------------------------------------------

    #[test]
    fn rescue_transition_table() {
        use RescueStatus::*;
        assert!(RescueStatus::is_valid_transition(Pending, OnGoing));
        assert!(RescueStatus::is_valid_transition(Pending, Cancelled));
        assert!(RescueStatus::is_valid_transition(OnGoing, Rescued));
        assert!(RescueStatus::is_valid_transition(OnGoing, Failed));
        assert!(RescueStatus::is_valid_transition(OnGoing, Cancelled));
        assert!(RescueStatus::is_valid_transition(Rescued, OnGoing));

        assert!(!RescueStatus::is_valid_transition(Pending, Rescued));
        assert!(!RescueStatus::is_valid_transition(Rescued, Pending));
        assert!(!RescueStatus::is_valid_transition(Failed, OnGoing));
        assert!(!RescueStatus::is_valid_transition(Cancelled, Pending));
    }

    #[test]
    fn adoption_terminal_states_have_no_targets() {
        use AdoptionStatus::*;
        assert!(AdoptionStatus::is_valid_transition(Pending, Approved));
        assert!(AdoptionStatus::is_valid_transition(Pending, Denied));
        assert!(AdoptionStatus::is_valid_transition(Pending, Cancelled));
        for terminal in [Approved, Denied, Cancelled] {
            assert!(terminal.allowed_targets().is_empty());
        }
    }

    #[test]
    fn adopted_is_never_a_direct_target() {
        for from in [
            AnimalStatus::NeedsSetup,
            AnimalStatus::Healthy,
            AnimalStatus::Recovering,
            AnimalStatus::Injured,
        ] {
            assert!(!AnimalStatus::is_valid_transition(from, AnimalStatus::Adopted));
        }
    }

    #[test]
    fn available_substates_move_freely() {
        use AnimalStatus::*;
        assert!(AnimalStatus::is_valid_transition(Healthy, Recovering));
        assert!(AnimalStatus::is_valid_transition(Recovering, Injured));
        assert!(AnimalStatus::is_valid_transition(Injured, Healthy));
        assert!(AnimalStatus::is_valid_transition(NeedsSetup, Healthy));
        assert!(!AnimalStatus::is_valid_transition(Adopted, Healthy));
    }

    // -----------------------------------------------------------------------
    // Activity / availability
    // -----------------------------------------------------------------------

    #[test]
    fn rescue_active_set() {
        assert!(RescueStatus::Pending.is_active());
        assert!(RescueStatus::OnGoing.is_active());
        assert!(!RescueStatus::Rescued.is_active());
        assert!(!RescueStatus::Failed.is_active());
        assert!(!RescueStatus::Cancelled.is_active());
    }

    #[test]
    fn needs_setup_is_not_available_for_adoption() {
        assert!(!AnimalStatus::NeedsSetup.is_available());
        assert!(!AnimalStatus::Adopted.is_available());
        assert!(AnimalStatus::Healthy.is_available());
        assert!(AnimalStatus::Recovering.is_available());
        assert!(AnimalStatus::Injured.is_available());
    }

    #[test]
    fn urgency_parses_bare_levels_and_labels() {
        assert_eq!(Urgency::normalize("high"), Urgency::High);
        assert_eq!(Urgency::normalize("High - Immediate help needed"), Urgency::High);
        assert_eq!(Urgency::normalize("Low - Animal appears safe"), Urgency::Low);
        assert_eq!(Urgency::normalize("whatever"), Urgency::Medium);
        assert_eq!(Urgency::normalize(""), Urgency::Medium);
    }

    #[test]
    fn classify_precedence() {
        assert_eq!(classify(true, false, false), Lifecycle::Active);
        assert_eq!(classify(false, false, false), Lifecycle::Terminal);
        assert_eq!(classify(true, true, false), Lifecycle::Archived);
        assert_eq!(classify(false, true, true), Lifecycle::Removed);
    }
}
