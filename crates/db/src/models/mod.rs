//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct
//! matching the database row, plus insert DTOs where the engine
//! writes rows.

pub mod delivery;
pub mod execution_log;
pub mod material;
pub mod task;
pub mod template;
pub mod trigger;
pub mod user;
