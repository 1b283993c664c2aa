//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async data-access
//! methods that accept `&PgPool` as the first argument. Lookups return
//! `Option` for not-found; only transport/storage failures surface as
//! `sqlx::Error`.

pub mod delivery_repo;
pub mod execution_log_repo;
pub mod material_repo;
pub mod quality_test_repo;
pub mod task_repo;
pub mod template_repo;
pub mod trigger_repo;
pub mod user_repo;

pub use delivery_repo::DeliveryRepo;
pub use execution_log_repo::ExecutionLogRepo;
pub use material_repo::MaterialRepo;
pub use quality_test_repo::QualityTestRepo;
pub use task_repo::TaskRepo;
pub use template_repo::TemplateRepo;
pub use trigger_repo::TriggerRepo;
pub use user_repo::UserRepo;
