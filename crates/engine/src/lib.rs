//! Transition engine for the PawRes shelter tracker.
//!
//! The [`TransitionEngine`] is the only component permitted to change an
//! entity's canonical status and the sole author of cross-entity derived
//! effects (animal creation on rescue completion, sibling auto-denial on
//! adoption approval). Every multi-step mutation runs through exactly one
//! store transaction; the query cache is invalidated synchronously after
//! commit, never before.

pub mod archive;
pub mod cache;
pub mod engine;
pub mod error;
pub mod import;
pub mod queries;

pub use cache::QueryCache;
pub use engine::{ApprovalOutcome, RescueOutcome, TransitionEngine};
pub use error::{EngineError, EngineResult};
pub use import::{ImportOutcome, ImportRowError};
