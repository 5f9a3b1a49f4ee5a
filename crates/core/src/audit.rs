//! Audit logging constants and integrity helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by the
//! repository layer, the engine, and any future CLI tooling. Every engine
//! mutation writes an audit entry inside the same transaction; entries are
//! chained with a SHA-256 integrity hash so tampering with history is
//! detectable.

use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for audit log entries.
pub mod actions {
    pub const REPORT_SUBMITTED: &str = "report_submitted";
    pub const RESCUE_TRANSITION: &str = "rescue_transition";
    pub const ANIMAL_CREATED: &str = "animal_created";
    pub const ANIMAL_TRANSITION: &str = "animal_transition";
    pub const REQUEST_SUBMITTED: &str = "request_submitted";
    pub const ADOPTION_APPROVED: &str = "adoption_approved";
    pub const ADOPTION_DENIED: &str = "adoption_denied";
    pub const ADOPTION_CANCELLED: &str = "adoption_cancelled";
    pub const ARCHIVED: &str = "archived";
    pub const RESTORED: &str = "restored";
    pub const REMOVED: &str = "removed";
    pub const PURGED: &str = "purged";
    pub const USER_CREATED: &str = "user_created";
    pub const IMPORT_COMPLETED: &str = "import_completed";
}

// ---------------------------------------------------------------------------
// Integrity hash computation
// ---------------------------------------------------------------------------

/// Known seed value for the first entry in the hash chain.
const CHAIN_SEED: &str = "PAWRES_AUDIT_CHAIN_SEED_V1";

/// Compute the SHA-256 integrity hash for an audit log entry.
///
/// `prev_hash` is the hash of the previous entry, or `None` for the first
/// entry in the chain. `entry_data` is the canonical string representation
/// of the entry's content (the JSON-serialized detail fields).
pub fn compute_integrity_hash(prev_hash: Option<&str>, entry_data: &str) -> String {
    let prev = prev_hash.unwrap_or(CHAIN_SEED);
    let mut hasher = Sha256::new();
    hasher.update(format!("{prev}|{entry_data}").as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entry_uses_seed() {
        let hash = compute_integrity_hash(None, "entry_1");
        // SHA-256 hex digest is always 64 characters.
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn chained_entry_differs_from_first() {
        let first = compute_integrity_hash(None, "entry_1");
        let second = compute_integrity_hash(Some(&first), "entry_2");
        assert_ne!(first, second);
        assert_eq!(second.len(), 64);
    }

    #[test]
    fn same_input_produces_same_hash() {
        let a = compute_integrity_hash(None, "same");
        let b = compute_integrity_hash(None, "same");
        assert_eq!(a, b);
    }

    #[test]
    fn different_prev_hash_produces_different_result() {
        let a = compute_integrity_hash(Some("hash_a"), "same");
        let b = compute_integrity_hash(Some("hash_b"), "same");
        assert_ne!(a, b);
    }
}
