use std::sync::Arc;

use pawres_core::classify::BreedClassifier;
use pawres_db::Store;
use pawres_engine::TransitionEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or pools).
#[derive(Clone)]
pub struct AppState {
    /// Embedded store handle (reader pool for plain GETs).
    pub store: Store,
    /// The transition engine: every workflow mutation goes through it.
    pub engine: TransitionEngine,
    /// Injected breed-classification capability. Suggestions are applied by
    /// callers before create/update operations; the engine never sees it.
    pub classifier: Arc<dyn BreedClassifier>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
