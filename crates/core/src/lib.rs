//! Pure domain logic for the mortar trigger engine.
//!
//! Everything in this crate is side-effect free and database free:
//!
//! - [`value`] — dot-path resolution and scalar coercion over JSON payloads.
//! - [`condition`] — the persisted condition tree data model.
//! - [`evaluator`] — condition / group / tree evaluation.
//! - [`template`] — compiled `{{path}}` message templates.
//! - [`channels`], [`events`], [`roles`] — well-known name constants.

pub mod channels;
pub mod condition;
pub mod evaluator;
pub mod events;
pub mod roles;
pub mod template;
pub mod types;
pub mod value;
