//! Event dispatch: fans one domain event out to every matching trigger.
//!
//! Trigger executions are isolated from each other by construction
//! (the executor never returns an error), so one misbehaving trigger
//! cannot prevent the rest of the dispatch set from running. The only
//! error path here is the initial trigger query.

use mortar_core::types::DbId;
use mortar_db::repositories::TriggerRepo;
use mortar_db::DbPool;

use crate::event::DomainEvent;
use crate::executor::{ExecutionOutcome, TriggerExecutor};

/// What happened when one event was fanned out.
#[derive(Debug)]
pub struct DispatchSummary {
    pub event_type: String,
    pub triggers_matched: usize,
    pub executed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Per-trigger outcomes in dispatch order.
    pub outcomes: Vec<(DbId, ExecutionOutcome)>,
}

impl DispatchSummary {
    /// A summary with no trigger executions, used when no triggers
    /// match or the subject entity no longer exists.
    pub fn empty(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            triggers_matched: 0,
            executed: 0,
            skipped: 0,
            failed: 0,
            outcomes: Vec::new(),
        }
    }

    fn record(&mut self, trigger_id: DbId, outcome: ExecutionOutcome) {
        match &outcome {
            ExecutionOutcome::Executed { .. } => self.executed += 1,
            ExecutionOutcome::Skipped(_) => self.skipped += 1,
            ExecutionOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push((trigger_id, outcome));
    }
}

/// Fans domain events out to the triggers registered for them.
pub struct EventDispatcher {
    pool: DbPool,
    executor: TriggerExecutor,
}

impl EventDispatcher {
    /// Create a dispatcher around an executor.
    pub fn new(pool: DbPool, executor: TriggerExecutor) -> Self {
        Self { pool, executor }
    }

    /// Run every trigger registered for the event's type.
    ///
    /// Inactive triggers are included in the dispatch set and skip
    /// inside the executor, so their state is visible in the summary.
    pub async fn dispatch(&self, event: &DomainEvent) -> Result<DispatchSummary, sqlx::Error> {
        let triggers = TriggerRepo::list_by_event_type(&self.pool, &event.event_type).await?;

        let mut summary = DispatchSummary::empty(&event.event_type);
        summary.triggers_matched = triggers.len();

        for trigger in &triggers {
            let outcome = self.executor.execute(trigger.id, event).await;
            summary.record(trigger.id, outcome);
        }

        if summary.triggers_matched == 0 {
            tracing::debug!(
                event_type = %summary.event_type,
                entity_id = event.entity_id,
                "No triggers registered for event"
            );
        } else {
            tracing::info!(
                event_type = %summary.event_type,
                entity_id = event.entity_id,
                triggers_matched = summary.triggers_matched,
                executed = summary.executed,
                skipped = summary.skipped,
                failed = summary.failed,
                "Event dispatched"
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SkipReason;

    #[test]
    fn empty_summary_has_no_counts() {
        let summary = DispatchSummary::empty("stock_level_change");
        assert_eq!(summary.event_type, "stock_level_change");
        assert_eq!(summary.triggers_matched, 0);
        assert_eq!(summary.executed + summary.skipped + summary.failed, 0);
        assert!(summary.outcomes.is_empty());
    }

    #[test]
    fn record_tallies_each_outcome_kind() {
        let mut summary = DispatchSummary::empty("task_overdue");
        summary.record(1, ExecutionOutcome::Executed { notifications_sent: 2 });
        summary.record(2, ExecutionOutcome::Skipped(SkipReason::TriggerInactive));
        summary.record(3, ExecutionOutcome::Failed { error: "boom".into() });
        summary.record(4, ExecutionOutcome::Skipped(SkipReason::ConditionsNotMet));

        assert_eq!(summary.executed, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.outcomes.len(), 4);
        assert_eq!(summary.outcomes[0].0, 1);
    }
}
