//! Trigger evaluation and notification dispatch engine.
//!
//! This crate decides, given a business event (stock level change,
//! delivery delay, failed quality test, overdue or completed task),
//! which user-defined triggers fire, renders their message templates,
//! and delivers the result across the enabled channels:
//!
//! - [`DomainEvent`] — the event envelope fed into dispatch.
//! - [`transport`] — email/SMS sender traits and their SMTP and HTTP
//!   gateway implementations.
//! - [`RecipientResolver`] — maps an event to concrete recipients.
//! - [`TriggerExecutor`] — runs one trigger end to end and writes the
//!   execution audit log.
//! - [`EventDispatcher`] — fans one event out to every matching trigger.
//! - [`EventProducers`] — builds per-entity event payloads.
//! - [`Scheduler`] — periodic scans that feed the producers.

pub mod dispatcher;
pub mod event;
pub mod executor;
pub mod producers;
pub mod recipients;
pub mod scheduler;
pub mod transport;

pub use dispatcher::{DispatchSummary, EventDispatcher};
pub use event::DomainEvent;
pub use executor::{ExecutionOutcome, SkipReason, TriggerExecutor};
pub use producers::EventProducers;
pub use recipients::{Recipient, RecipientResolver};
pub use scheduler::{Scheduler, SchedulerConfig};
