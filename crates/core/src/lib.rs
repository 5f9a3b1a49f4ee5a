//! Domain core for the PawRes shelter operations tracker.
//!
//! This crate has no database dependency: it defines the shared types, the
//! error taxonomy, audit constants, validation limits, and the injected
//! classifier capability. The status registry lives with the row models in
//! `pawres-db` (it is the canonical column encoding); everything that
//! orchestrates transitions lives in `pawres-engine`.

pub mod audit;
pub mod classify;
pub mod error;
pub mod limits;
pub mod types;

pub use error::CoreError;
pub use types::{ActorContext, DbId, EntityKind, Timestamp};
