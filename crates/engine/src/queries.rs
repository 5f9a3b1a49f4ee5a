//! Cached aggregate reads.
//!
//! These are the read-heavy queries the short-TTL cache absorbs: the public
//! adoptable-animal listing and the admin dashboard counts. Both tolerate
//! the documented staleness window; every engine mutation that could change
//! them invalidates the namespace right after commit.

use pawres_db::models::animal::Animal;
use pawres_db::repositories::dashboard_repo::DashboardCounts;
use pawres_db::repositories::{AnimalRepo, DashboardRepo};

use crate::cache::namespaces;
use crate::engine::TransitionEngine;
use crate::error::{EngineError, EngineResult};

/// Cache keys for the aggregate reads.
const KEY_ADOPTABLE: &str = "animals:adoptable";
const KEY_DASHBOARD: &str = "dashboard:counts";

impl TransitionEngine {
    /// Animals currently open to adoption requests (available substates,
    /// hidden rows excluded). Served from cache within the TTL window.
    pub async fn adoptable_animals(&self) -> EngineResult<Vec<Animal>> {
        debug_assert!(KEY_ADOPTABLE.starts_with(namespaces::ANIMALS));
        self.cache()
            .get_or_compute(KEY_ADOPTABLE, None, || async {
                let animals = AnimalRepo::list_available(self.store().reader()).await?;
                Ok::<_, EngineError>(animals)
            })
            .await
    }

    /// Dashboard summary counts. Served from cache within the TTL window.
    pub async fn dashboard_counts(&self) -> EngineResult<DashboardCounts> {
        debug_assert!(KEY_DASHBOARD.starts_with(namespaces::DASHBOARD));
        self.cache()
            .get_or_compute(KEY_DASHBOARD, None, || async {
                let counts = DashboardRepo::counts(self.store().reader()).await?;
                Ok::<_, EngineError>(counts)
            })
            .await
    }
}
