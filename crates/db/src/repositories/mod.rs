//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! an `impl SqliteExecutor` as the first argument, so the same method runs
//! against the reader pool or inside an open transaction (`&mut *tx`).
//! Multi-step workflow mutations are composed by the transition engine, not
//! here.

pub mod adoption_request_repo;
pub mod animal_repo;
pub mod audit_repo;
pub mod dashboard_repo;
pub mod rescue_report_repo;
pub mod trash_repo;
pub mod user_repo;

pub use adoption_request_repo::AdoptionRequestRepo;
pub use animal_repo::AnimalRepo;
pub use audit_repo::AuditRepo;
pub use dashboard_repo::DashboardRepo;
pub use rescue_report_repo::RescueReportRepo;
pub use trash_repo::TrashRepo;
pub use user_repo::UserRepo;
